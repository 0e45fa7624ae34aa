// zombie_ai/src/systems/ai/behavior.rs
//
// Pure transition function of the zombie state machine. `decide` looks at a
// perception snapshot and says where to go next; the agent record applies the
// decision (and may refuse it under the state-change throttle).

use crate::core::types::{EnemyView, Vec2, ZombieState};
use crate::systems::ai::targeting;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetAction {
    Keep,
    Bind(EnemyView),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalAction {
    Keep,
    Set(Vec2),
    Clear,
    /// Pick a fresh random wander point and move there.
    NewWander,
    /// Stand-off point around the given target.
    TacticalAttack(EnemyView),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub next: ZombieState,
    pub target: TargetAction,
    pub goal: GoalAction,
}

impl Decision {
    fn stay(state: ZombieState, goal: GoalAction) -> Self {
        Decision { next: state, target: TargetAction::Keep, goal }
    }

    fn hunt(enemy: EnemyView) -> Self {
        Decision { next: ZombieState::Hunting, target: TargetAction::Bind(enemy), goal: GoalAction::Set(enemy.position) }
    }
}

/// Everything the state machine reads on one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Perception {
    pub position: Vec2,
    pub health_ratio: f32,
    pub aggro_active: bool,
    pub pack_behavior: bool,
    /// Detection range after evolution scaling.
    pub detection_range: f32,
    /// Extra range granted while chasing a target adopted from the pack.
    pub tracking_bonus: f32,
    pub attack_range: f32,
    pub flee_health_threshold: f32,
    pub wander_arrival_distance: f32,
    /// Currently bound target, already re-validated against the host.
    pub bound_target: Option<EnemyView>,
    /// Nearest valid enemy, only looked up in the searching states.
    pub nearest_enemy: Option<EnemyView>,
    pub wander_target: Option<Vec2>,
    /// Closest same-faction neighbor within the group radius.
    pub packmate: Option<Vec2>,
}

impl Perception {
    fn detects(&self, enemy: &EnemyView, extra: f32) -> bool {
        targeting::can_detect_player(self.position, self.detection_range + extra, 1.0, enemy)
    }

    fn detected_enemy(&self) -> Option<EnemyView> {
        self.nearest_enemy.filter(|e| self.detects(e, 0.0))
    }

    fn in_attack_range(&self, enemy: &EnemyView) -> bool {
        targeting::is_in_attack_range(self.position, self.attack_range, enemy)
    }

    fn wander_reached(&self) -> bool {
        match self.wander_target {
            None => true,
            Some(w) => !w.is_finite() || w.distance(self.position) <= self.wander_arrival_distance,
        }
    }

    fn lost_target(&self) -> Decision {
        if self.aggro_active {
            Decision { next: ZombieState::Wandering, target: TargetAction::Clear, goal: GoalAction::NewWander }
        } else {
            Decision { next: ZombieState::Idle, target: TargetAction::Clear, goal: GoalAction::Clear }
        }
    }
}

pub fn decide(state: ZombieState, p: &Perception) -> Decision {
    match state {
        ZombieState::Idle => {
            if let Some(enemy) = p.detected_enemy() {
                Decision::hunt(enemy)
            } else if p.pack_behavior {
                Decision::stay(ZombieState::Grouping, GoalAction::Keep)
            } else {
                Decision::stay(ZombieState::Wandering, GoalAction::NewWander)
            }
        }
        ZombieState::Wandering => {
            if let Some(enemy) = p.detected_enemy() {
                Decision::hunt(enemy)
            } else if p.wander_reached() {
                Decision::stay(ZombieState::Wandering, GoalAction::NewWander)
            } else {
                match p.wander_target {
                    Some(w) => Decision::stay(ZombieState::Wandering, GoalAction::Set(w)),
                    None => Decision::stay(ZombieState::Wandering, GoalAction::NewWander),
                }
            }
        }
        ZombieState::Hunting => match p.bound_target {
            Some(enemy) if p.detects(&enemy, p.tracking_bonus) => {
                if p.in_attack_range(&enemy) {
                    Decision {
                        next: ZombieState::Attacking,
                        target: TargetAction::Bind(enemy),
                        goal: GoalAction::TacticalAttack(enemy),
                    }
                } else {
                    Decision::stay(ZombieState::Hunting, GoalAction::Set(enemy.position))
                }
            }
            _ => p.lost_target(),
        },
        ZombieState::Attacking => match p.bound_target {
            Some(enemy) if p.in_attack_range(&enemy) => {
                Decision::stay(ZombieState::Attacking, GoalAction::TacticalAttack(enemy))
            }
            Some(enemy) => Decision::hunt(enemy),
            None => p.lost_target(),
        },
        ZombieState::Fleeing => {
            if p.health_ratio > p.flee_health_threshold {
                Decision { next: ZombieState::Idle, target: TargetAction::Keep, goal: GoalAction::Clear }
            } else {
                Decision::stay(ZombieState::Fleeing, GoalAction::Keep)
            }
        }
        ZombieState::Grouping => {
            if let Some(enemy) = p.detected_enemy() {
                Decision::hunt(enemy)
            } else if let Some(mate) = p.packmate {
                Decision::stay(ZombieState::Grouping, GoalAction::Set(mate))
            } else if p.wander_reached() {
                Decision::stay(ZombieState::Grouping, GoalAction::NewWander)
            } else {
                Decision::stay(ZombieState::Grouping, GoalAction::Keep)
            }
        }
    }
}
