// zombie_ai/src/systems/ai/zombie_ai.rs
//
// Per-zombie AI record. One `ZombieAI` lives alongside each zombie entity and
// is advanced once per tick by the host through `update`.

use crate::core::config::AiConfig;
use crate::core::error::{AiError, AiResult};
use crate::core::types::{DamageSource, EnemyView, EntityId, MovementIntent, NeighborView, Vec2, ZombieState};
use crate::systems::ai::behavior::{self, GoalAction, Perception, TargetAction};
use crate::systems::ai::host::AiHost;
use crate::systems::ai::lod::{LodLevel, LodScheduler};
use crate::systems::ai::pack;
use crate::systems::ai::pathfinding::{self, StuckOutcome, StuckTracker};
use crate::systems::ai::steering::{self, CirclingPhase, SteeringInput};
use crate::systems::ai::tactics::{self, TacticalVariant};
use crate::systems::ai::targeting;
use metrics::counter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::Key;
use smallvec::SmallVec;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Validated configuration shared by every agent of a horde.
#[derive(Debug)]
pub struct AiSettings {
    pub config: AiConfig,
    pub lod: LodScheduler,
}

impl AiSettings {
    pub fn new(config: AiConfig) -> AiResult<Arc<Self>> {
        config.validate()?;
        let lod = LodScheduler::new(config.lod.clone())?;
        Ok(Arc::new(AiSettings { config, lod }))
    }
}

/// Host-side facts about the zombie this record drives, sampled each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentBody {
    pub id: EntityId,
    pub position: Vec2,
    pub detection_range_base: f32,
    pub attack_range: f32,
    pub health: f32,
    pub max_health: f32,
    pub evolution_multiplier: f32,
    pub pack_behavior: bool,
    pub tactics: TacticalVariant,
}

impl AgentBody {
    /// Health fraction; broken bookkeeping counts as full health so it can
    /// never trigger a flee on its own.
    pub fn health_ratio(&self) -> f32 {
        let ratio = self.health / self.max_health;
        if self.max_health > 0.0 && ratio.is_finite() { ratio.max(0.0) } else { 1.0 }
    }

    pub fn detection_range(&self) -> f32 {
        self.detection_range_base * self.evolution_multiplier
    }
}

type NeighborBuf = SmallVec<[NeighborView; 8]>;
type PlayerBuf = SmallVec<[EnemyView; 4]>;

pub struct ZombieAI {
    id: EntityId,
    settings: Arc<AiSettings>,

    current_state: ZombieState,
    target: Option<EntityId>,
    pack_adopted: bool,
    target_position: Option<Vec2>,
    intermediate_target: Option<Vec2>,
    wander_target: Option<Vec2>,

    last_path_update: Option<Duration>,
    last_target_switch: Option<Duration>,
    last_lod_update: Option<Duration>,
    last_state_change: Option<Duration>,
    circling_since: Option<Duration>,
    aggro_until: Duration,

    last_position: Option<Vec2>,
    stuck: StuckTracker,

    lod_level: LodLevel,
    distance_to_nearest_player: f32,

    rng: StdRng,
    /// +1 or -1; which way this agent orbits, deflects and flanks.
    side: f32,

    steering_direction: Vec2,
    attack_ready: bool,
}

impl ZombieAI {
    pub fn new(id: EntityId, settings: Arc<AiSettings>, world_seed: u64) -> Self {
        let mut seed_bytes = [0u8; 16];
        seed_bytes[..8].copy_from_slice(&id.data().as_ffi().to_le_bytes());
        seed_bytes[8..].copy_from_slice(&world_seed.to_le_bytes());
        let mut rng = StdRng::seed_from_u64(seahash::hash(&seed_bytes));
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        ZombieAI {
            id,
            settings,
            current_state: ZombieState::Idle,
            target: None,
            pack_adopted: false,
            target_position: None,
            intermediate_target: None,
            wander_target: None,
            last_path_update: None,
            last_target_switch: None,
            last_lod_update: None,
            last_state_change: None,
            circling_since: None,
            aggro_until: Duration::ZERO,
            last_position: None,
            stuck: StuckTracker::default(),
            lod_level: LodLevel::Minimal,
            distance_to_nearest_player: f32::INFINITY,
            rng,
            side,
            steering_direction: Vec2::ZERO,
            attack_ready: false,
        }
    }

    // --- Monitoring / read-only accessors ---

    pub fn state(&self) -> ZombieState { self.current_state }
    pub fn target(&self) -> Option<EntityId> { self.target }
    pub fn target_position(&self) -> Option<Vec2> { self.target_position }
    pub fn intermediate_target(&self) -> Option<Vec2> { self.intermediate_target }
    pub fn wander_target(&self) -> Option<Vec2> { self.wander_target }
    pub fn stuck_since(&self) -> Option<Duration> { self.stuck.stuck_since() }
    pub fn circling_since(&self) -> Option<Duration> { self.circling_since }
    pub fn aggro_until(&self) -> Duration { self.aggro_until }
    pub fn last_target_switch(&self) -> Option<Duration> { self.last_target_switch }
    pub fn last_position(&self) -> Option<Vec2> { self.last_position }
    pub fn lod(&self) -> LodLevel { self.lod_level }
    pub fn lod_level(&self) -> u8 { self.lod_level.as_u8() }
    pub fn distance_to_nearest_player(&self) -> f32 { self.distance_to_nearest_player }
    pub fn steering_direction(&self) -> Vec2 { self.steering_direction }

    /// What the pack may see of this agent.
    pub fn neighbor_view(&self, position: Vec2) -> NeighborView {
        NeighborView { id: self.id, position, state: self.current_state, target: self.target }
    }

    /// Snapshot of the last `update`. Pure: repeated calls agree.
    pub fn movement_intent(&self) -> MovementIntent {
        let (up, down, left, right) = steering::discretize(
            self.steering_direction,
            self.settings.config.steering.intent_deadzone,
        );
        MovementIntent {
            up,
            down,
            left,
            right,
            attack: self.attack_ready,
            state: self.current_state,
            target_point: self.intermediate_target.or(self.target_position),
        }
    }

    /// Advances timers, LOD, state, path and steering for one tick.
    pub fn update<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H) -> AiResult<()> {
        if !body.position.is_finite() {
            self.steering_direction = Vec2::ZERO;
            self.attack_ready = false;
            return Err(AiError::InvalidGeometry {
                entity: self.id,
                detail: format!("non-finite position {:?}", body.position),
            });
        }
        let now = host.now();
        let settings = Arc::clone(&self.settings);

        // Cheap and correctness-critical: every tick regardless of LOD.
        self.check_stuck(body, now);

        if settings.lod.lod_update_due(self.last_lod_update, now) {
            self.refresh_lod(body, host, now);
        }

        let path_due = LodScheduler::is_due(
            self.last_path_update,
            now,
            settings.lod.pathfinding_interval(self.lod_level),
        );
        if path_due && body.pack_behavior {
            self.coordinate_pack(body, host, now);
        }

        if settings.lod.should_update_state(self.lod_level, &mut self.rng) {
            self.evaluate_state(body, host, now);
        } else {
            trace!("[Zombie {}] state update skipped at LOD {:?}", self.id, self.lod_level);
        }

        if path_due {
            self.refresh_path(body, host);
            self.last_path_update = Some(now);
        }

        self.steer(body, host, now);
        self.last_position = Some(body.position);
        Ok(())
    }

    /// Damage notification from the combat model.
    pub fn on_damaged(&mut self, body: &AgentBody, source: &DamageSource, now: Duration) {
        if source.is_same_faction || !source.position.is_finite() || !body.position.is_finite() {
            return;
        }
        let behavior_cfg = &self.settings.config.behavior;
        self.aggro_until = self.aggro_until.max(now + behavior_cfg.aggro_timeout());

        if body.health_ratio() < behavior_cfg.flee_health_threshold {
            let mut away = (body.position - source.position).normalize_or_zero();
            if away == Vec2::ZERO {
                away = Vec2::new(1.0, 0.0);
            }
            let flee_point = body.position + away * behavior_cfg.flee_distance;
            self.force_transition(ZombieState::Fleeing, now);
            self.target = None;
            self.pack_adopted = false;
            self.target_position = Some(flee_point);
            self.intermediate_target = None;
            debug!(
                "[Zombie {}] fleeing from {} toward ({:.1}, {:.1})",
                self.id, source.id, flee_point.x, flee_point.y
            );
            return;
        }

        // Already engaging this attacker: aggro refreshed above, nothing to rebind.
        let engaged = matches!(self.current_state, ZombieState::Hunting | ZombieState::Attacking);
        if engaged && self.target == Some(source.id) {
            return;
        }

        let cooldown_elapsed = match self.last_target_switch {
            None => true,
            Some(last) => now.saturating_sub(last) >= behavior_cfg.target_switch_cooldown(),
        };
        if self.target.is_none() || cooldown_elapsed {
            self.force_transition(ZombieState::Hunting, now);
            self.bind_target(source.id, source.position, now);
            self.pack_adopted = false;
            debug!("[Zombie {}] aggro on attacker {}", self.id, source.id);
        }
    }

    /// Evolution level-up: longer memory of aggression.
    pub fn on_evolved(&mut self, multiplier: f32, now: Duration) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return;
        }
        let extended = now + self.settings.config.behavior.aggro_timeout().mul_f32(multiplier);
        self.aggro_until = self.aggro_until.max(extended);
        debug!("[Zombie {}] evolved x{:.2}, aggro until {:?}", self.id, multiplier, self.aggro_until);
    }

    // --- Internals ---

    fn is_aggro(&self, now: Duration) -> bool {
        now < self.aggro_until
    }

    fn resolve_target<H: AiHost + ?Sized>(&self, host: &H) -> Option<EnemyView> {
        self.target
            .and_then(|id| host.enemy(id))
            .filter(|e| !e.dead && !e.is_same_faction && e.position.is_finite())
    }

    fn bind_target(&mut self, id: EntityId, position: Vec2, now: Duration) {
        if self.target != Some(id) {
            self.last_target_switch = Some(now);
        }
        self.target = Some(id);
        self.target_position = Some(position);
    }

    /// Throttled state change. Returns false if the cooldown refused it.
    fn transition(&mut self, next: ZombieState, now: Duration) -> bool {
        if next == self.current_state {
            return true;
        }
        if let Some(last) = self.last_state_change {
            if now.saturating_sub(last) < self.settings.config.behavior.state_change_cooldown() {
                trace!(
                    "[Zombie {}] {:?} -> {:?} held back by state cooldown",
                    self.id, self.current_state, next
                );
                return false;
            }
        }
        self.apply_transition(next, now);
        true
    }

    /// Damage-driven changes skip the throttle.
    fn force_transition(&mut self, next: ZombieState, now: Duration) {
        if next != self.current_state {
            self.apply_transition(next, now);
        }
    }

    fn apply_transition(&mut self, next: ZombieState, now: Duration) {
        debug!("[Zombie {}] {:?} -> {:?}", self.id, self.current_state, next);
        counter!(
            "zombie_ai_state_transitions_total",
            "from" => self.current_state.as_str(),
            "to" => next.as_str()
        )
        .increment(1);
        self.current_state = next;
        self.last_state_change = Some(now);
        self.intermediate_target = None;
        if next != ZombieState::Attacking {
            self.circling_since = None;
        }
    }

    fn random_wander_point(&mut self, origin: Vec2, min_radius: f32, max_radius: f32) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        let radius = if max_radius > min_radius { self.rng.gen_range(min_radius..max_radius) } else { min_radius };
        origin + Vec2::from_polar(radius, angle)
    }

    fn pick_wander_target(&mut self, origin: Vec2, min_radius: f32, max_radius: f32) -> Vec2 {
        let point = self.random_wander_point(origin, min_radius, max_radius);
        self.wander_target = Some(point);
        self.target_position = Some(point);
        self.intermediate_target = None;
        trace!("[Zombie {}] new wander target ({:.1}, {:.1})", self.id, point.x, point.y);
        point
    }

    /// Point the agent is currently steering for, if any.
    fn movement_goal(&self) -> Option<Vec2> {
        self.intermediate_target
            .or(self.target_position)
            .or(if self.current_state == ZombieState::Wandering { self.wander_target } else { None })
            .filter(|g| g.is_finite())
    }

    fn check_stuck(&mut self, body: &AgentBody, now: Duration) {
        let settings = Arc::clone(&self.settings);
        let behavior_cfg = &settings.config.behavior;
        let pathfinding_cfg = &settings.config.pathfinding;
        // Holding position next to the goal (a packmate, an attack spot) is not being stuck.
        let pursuing = self
            .movement_goal()
            .map_or(false, |goal| goal.distance(body.position) > pathfinding_cfg.stuck_threshold);
        match self.stuck.check(body.position, pursuing, now, pathfinding_cfg) {
            StuckOutcome::Moving | StuckOutcome::Waiting => {}
            StuckOutcome::Recover => {
                debug!("[Zombie {}] stuck, picking a new wander target", self.id);
                self.pick_wander_target(body.position, behavior_cfg.wander_min_radius, behavior_cfg.wander_radius);
            }
            StuckOutcome::Escalate => {
                debug!("[Zombie {}] still stuck after recovery, forcing a wander reset", self.id);
                self.force_transition(ZombieState::Wandering, now);
                self.target = None;
                self.pack_adopted = false;
                let far_min = 2.0 * behavior_cfg.wander_min_radius;
                self.pick_wander_target(body.position, far_min, 2.0 * behavior_cfg.wander_radius);
            }
        }
    }

    fn refresh_lod<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H, now: Duration) {
        let distance = host
            .nearest_enemy(body.position, Some(self.id))
            .map(|e| body.position.distance(e.position))
            .filter(|d| d.is_finite())
            .unwrap_or(f32::INFINITY);
        let level = self.settings.lod.classify(distance);
        if level != self.lod_level {
            trace!("[Zombie {}] LOD {:?} -> {:?} (distance {:.1})", self.id, self.lod_level, level, distance);
        }
        self.distance_to_nearest_player = distance;
        self.lod_level = level;
        self.last_lod_update = Some(now);
    }

    fn coordinate_pack<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H, now: Duration) {
        if matches!(self.current_state, ZombieState::Fleeing | ZombieState::Attacking) {
            return;
        }
        let pack_cfg = &self.settings.config.pack;
        if !pack::may_adopt(self.target, self.last_target_switch, now, pack_cfg.adoption_cooldown()) {
            return;
        }
        let neighbors: NeighborBuf = host
            .nearby_agents(body.position, pack_cfg.group_radius)
            .into_iter()
            .filter(|n| n.id != self.id)
            .collect();
        let adopted = pack::find_pack_target(self.id, body.position, self.target, &neighbors, |id| host.enemy(id));
        if let Some(enemy) = adopted {
            if self.transition(ZombieState::Hunting, now) {
                self.bind_target(enemy.id, enemy.position, now);
                self.pack_adopted = true;
                debug!("[Zombie {}] joined the pack hunt on {}", self.id, enemy.id);
            }
        }
    }

    fn evaluate_state<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H, now: Duration) {
        let settings = Arc::clone(&self.settings);
        let config = &settings.config;
        let state = self.current_state;

        let bound_target = self.resolve_target(host);
        let searching = matches!(state, ZombieState::Idle | ZombieState::Wandering | ZombieState::Grouping);
        let nearest_enemy = if searching { host.nearest_enemy(body.position, Some(self.id)) } else { None };
        let packmate = if state == ZombieState::Grouping {
            let neighbors: NeighborBuf = host
                .nearby_agents(body.position, config.pack.group_radius)
                .into_iter()
                .filter(|n| n.id != self.id)
                .collect();
            pack::nearest_packmate(self.id, body.position, &neighbors)
        } else {
            None
        };

        let perception = Perception {
            position: body.position,
            health_ratio: body.health_ratio(),
            aggro_active: self.is_aggro(now),
            pack_behavior: body.pack_behavior,
            detection_range: body.detection_range(),
            tracking_bonus: if self.pack_adopted { config.pack.group_radius } else { 0.0 },
            attack_range: body.attack_range,
            flee_health_threshold: config.behavior.flee_health_threshold,
            wander_arrival_distance: config.behavior.wander_arrival_distance,
            bound_target,
            nearest_enemy,
            wander_target: self.wander_target,
            packmate,
        };

        let decision = behavior::decide(state, &perception);
        trace!("[Zombie {}] decision in {:?}: {:?}", self.id, state, decision);

        if !self.transition(decision.next, now) {
            return;
        }

        match decision.target {
            TargetAction::Keep => {}
            TargetAction::Bind(enemy) => {
                if self.target != Some(enemy.id) {
                    self.pack_adopted = false;
                }
                self.bind_target(enemy.id, enemy.position, now);
            }
            TargetAction::Clear => {
                self.target = None;
                self.pack_adopted = false;
            }
        }

        match decision.goal {
            GoalAction::Keep => {}
            GoalAction::Set(point) => self.target_position = Some(point),
            GoalAction::Clear => self.target_position = None,
            GoalAction::NewWander => {
                self.pick_wander_target(body.position, config.behavior.wander_min_radius, config.behavior.wander_radius);
            }
            GoalAction::TacticalAttack(enemy) => {
                let orbit = steering::orbit_direction(body.position, enemy.position, self.side);
                self.target_position = Some(tactics::tactical_attack_position(
                    body.position,
                    enemy.position,
                    body.attack_range,
                    config.steering.separation_distance,
                    config.steering.attack_position_factor,
                    orbit,
                    body.tactics,
                    self.side,
                ));
            }
        }
    }

    fn refresh_path<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H) {
        let goal = match self.target_position {
            Some(goal) if goal.is_finite() => goal,
            _ => {
                self.intermediate_target = None;
                return;
            }
        };
        let waypoint = pathfinding::find_path_to_target(
            body.position,
            goal,
            &self.settings.config.pathfinding,
            self.side,
            |region| host.nearby_obstacles(region),
        );
        self.intermediate_target = Some(waypoint).filter(|w| w.is_finite());
    }

    fn steer<H: AiHost + ?Sized>(&mut self, body: &AgentBody, host: &H, now: Duration) {
        let settings = Arc::clone(&self.settings);
        let steering_cfg = &settings.config.steering;

        // A reached waypoint falls back to the straight-line goal until the
        // next pathfinding tick.
        if let Some(waypoint) = self.intermediate_target {
            if waypoint.distance(body.position) <= settings.config.pathfinding.arrival_distance {
                self.intermediate_target = None;
            }
        }

        let bound = self.resolve_target(host);
        let engaged = self.current_state == ZombieState::Attacking
            && bound.map_or(false, |e| e.position.distance(body.position) <= steering_cfg.circling_radius);

        let mut orbit_target = None;
        match steering::advance_circling(&mut self.circling_since, engaged, now, steering_cfg.circling_timeout()) {
            CirclingPhase::Inactive => {}
            CirclingPhase::Orbiting => orbit_target = bound.map(|e| e.position),
            CirclingPhase::TimedOut => {
                debug!("[Zombie {}] circling timed out, breaking off", self.id);
                self.force_transition(ZombieState::Wandering, now);
                self.target = None;
                self.pack_adopted = false;
                let behavior_cfg = &settings.config.behavior;
                self.pick_wander_target(body.position, behavior_cfg.wander_min_radius, behavior_cfg.wander_radius);
            }
        }

        let players: PlayerBuf = host
            .enemies_near(body.position, steering_cfg.separation_distance)
            .into_iter()
            .collect();
        let agents: NeighborBuf = host
            .nearby_agents(body.position, steering_cfg.personal_space)
            .into_iter()
            .filter(|n| n.id != self.id)
            .collect();

        let goal = self.movement_goal();

        self.steering_direction = steering::steer(
            &SteeringInput {
                position: body.position,
                goal,
                players: &players,
                agents: &agents,
                orbit_target,
                orbit_side: self.side,
            },
            steering_cfg,
        );

        self.attack_ready = self.current_state == ZombieState::Attacking
            && self.resolve_target(host).map_or(false, |e| {
                targeting::is_in_attack_range(body.position, body.attack_range, &e)
            });
    }
}
