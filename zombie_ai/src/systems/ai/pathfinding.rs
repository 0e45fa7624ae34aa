// zombie_ai/src/systems/ai/pathfinding.rs
//
// Single-bounce local avoidance plus stuck detection. No graph search:
// probe ahead, deflect sideways once if something blocks, and rely on stuck
// recovery to get out of anything worse.

use crate::core::config::PathfindingConfig;
use crate::core::types::{Aabb, Obstacle, Vec2};
use std::time::Duration;

/// Next waypoint toward `target`.
///
/// `obstacles` answers a box query around the probe point; `side` (+1/-1)
/// selects which perpendicular the deflection uses.
pub fn find_path_to_target(
    position: Vec2,
    target: Vec2,
    config: &PathfindingConfig,
    side: f32,
    obstacles: impl FnOnce(Aabb) -> Vec<Obstacle>,
) -> Vec2 {
    let to_target = target - position;
    let distance = to_target.length();
    if !distance.is_finite() || distance <= config.arrival_distance {
        return target;
    }

    let heading = to_target.normalize_or_zero();
    let probe = position + heading * distance.min(config.probe_distance);
    let region = Aabb::around(probe, config.probe_half_extent);
    let blocked = obstacles(region).iter().any(|o| o.blocking);

    if blocked {
        let deflected = (heading + heading.perpendicular() * (config.deflect_weight * side)).normalize_or_zero();
        position + deflected * config.step_distance
    } else {
        position + heading * distance.min(config.step_distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckOutcome {
    Moving,
    /// Below the displacement threshold but not for long enough yet.
    Waiting,
    /// Timed out: pick a new wander goal.
    Recover,
    /// Timed out again without leaving the previous recovery spot.
    Escalate,
}

/// Displacement-over-time tracker. Displacement is measured from the anchor,
/// the last position at which the agent was seen making real progress.
#[derive(Debug, Clone, Default)]
pub struct StuckTracker {
    anchor: Option<Vec2>,
    stuck_since: Option<Duration>,
    recovery_position: Option<Vec2>,
}

impl StuckTracker {
    pub fn stuck_since(&self) -> Option<Duration> {
        self.stuck_since
    }

    /// `pursuing` is false while the agent has no goal or is already standing
    /// on it; holding still then is not being stuck.
    pub fn check(&mut self, position: Vec2, pursuing: bool, now: Duration, config: &PathfindingConfig) -> StuckOutcome {
        if !pursuing {
            self.settle(position);
            return StuckOutcome::Moving;
        }
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => {
                self.anchor = Some(position);
                return StuckOutcome::Moving;
            }
        };

        if position.distance(anchor) >= config.stuck_threshold {
            self.settle(position);
            return StuckOutcome::Moving;
        }

        let since = *self.stuck_since.get_or_insert(now);
        if now.saturating_sub(since) <= config.stuck_timeout() {
            return StuckOutcome::Waiting;
        }

        let escalate = self
            .recovery_position
            .map_or(false, |p| p.distance(position) <= config.stuck_escalation_radius);
        self.recovery_position = Some(position);
        self.stuck_since = None;
        self.anchor = Some(position);
        if escalate { StuckOutcome::Escalate } else { StuckOutcome::Recover }
    }

    fn settle(&mut self, position: Vec2) {
        *self = StuckTracker { anchor: Some(position), ..StuckTracker::default() };
    }
}
