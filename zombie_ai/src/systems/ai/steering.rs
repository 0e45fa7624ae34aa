// zombie_ai/src/systems/ai/steering.rs
//
// Turns a goal point into a capped 2D direction: goal seeking, repulsion from
// nearby players, orbiting a target that cannot be closed on, and a weaker
// repulsion from other zombies.

use crate::core::config::SteeringConfig;
use crate::core::types::{EnemyView, NeighborView, Vec2};
use slotmap::Key;
use std::time::Duration;

/// Goal closer than this produces no seek component.
pub const GOAL_ARRIVAL_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirclingPhase {
    /// Not engaged at close range; timer cleared.
    Inactive,
    /// Orbiting under the timeout.
    Orbiting,
    /// Orbit held too long. Timer cleared; caller must pick a new wander goal.
    TimedOut,
}

/// Advances the circling timer. `engaged` is true while attacking within the
/// circling radius of the target.
pub fn advance_circling(
    circling_since: &mut Option<Duration>,
    engaged: bool,
    now: Duration,
    timeout: Duration,
) -> CirclingPhase {
    if !engaged {
        *circling_since = None;
        return CirclingPhase::Inactive;
    }
    let started = *circling_since.get_or_insert(now);
    if now.saturating_sub(started) > timeout {
        *circling_since = None;
        CirclingPhase::TimedOut
    } else {
        CirclingPhase::Orbiting
    }
}

/// Unit seek direction toward `goal`, zero when already there.
pub fn seek(position: Vec2, goal: Option<Vec2>) -> Vec2 {
    match goal {
        Some(goal) if goal.is_finite() && position.distance(goal) > GOAL_ARRIVAL_DISTANCE => {
            (goal - position).normalize_or_zero()
        }
        _ => Vec2::ZERO,
    }
}

/// Linear falloff repulsion from every live non-horde entity within the
/// separation distance.
pub fn player_separation(position: Vec2, players: &[EnemyView], config: &SteeringConfig) -> Vec2 {
    let sep = config.separation_distance;
    let mut force = Vec2::ZERO;
    for player in players.iter().filter(|p| !p.dead && !p.is_same_faction) {
        let away = position - player.position;
        let distance = away.length();
        if !distance.is_finite() || distance >= sep {
            continue;
        }
        let strength = config.avoidance_force * (sep - distance) / sep;
        force += away.normalize_or_zero() * strength;
    }
    force
}

/// Perpendicular to the line toward the target; `side` picks the orbit sense.
pub fn orbit_direction(position: Vec2, target: Vec2, side: f32) -> Vec2 {
    (target - position).normalize_or_zero().perpendicular() * side
}

/// Blends `direction` toward a mostly-orbital heading around `target`.
pub fn apply_circling(direction: Vec2, position: Vec2, target: Vec2, side: f32, config: &SteeringConfig) -> Vec2 {
    let direct = (target - position).normalize_or_zero();
    let orbit = orbit_direction(position, target, side);
    let composed = orbit * config.circling_orbit_weight + direct * (1.0 - config.circling_orbit_weight);
    direction.lerp(composed, config.circling_speed)
}

/// Weaker repulsion from other zombies inside personal space.
pub fn agent_separation(position: Vec2, agents: &[NeighborView], config: &SteeringConfig) -> Vec2 {
    let space = config.personal_space;
    let mut force = Vec2::ZERO;
    for agent in agents {
        let away = position - agent.position;
        let distance = away.length();
        if !distance.is_finite() || distance >= space {
            continue;
        }
        let push = if distance > f32::EPSILON {
            away.normalize_or_zero()
        } else {
            // Exactly overlapping: split along a stable axis by id order.
            Vec2::new(if agent.id.data().as_ffi() % 2 == 0 { 1.0 } else { -1.0 }, 0.0)
        };
        force += push * (config.agent_separation_coefficient * (space - distance) / space);
    }
    force
}

pub struct SteeringInput<'a> {
    pub position: Vec2,
    pub goal: Option<Vec2>,
    pub players: &'a [EnemyView],
    pub agents: &'a [NeighborView],
    /// Target to orbit, when the circling phase is active.
    pub orbit_target: Option<Vec2>,
    pub orbit_side: f32,
}

/// Full steering pipeline. The result never exceeds unit length.
pub fn steer(input: &SteeringInput<'_>, config: &SteeringConfig) -> Vec2 {
    let mut direction = seek(input.position, input.goal);
    direction += player_separation(input.position, input.players, config);
    if let Some(target) = input.orbit_target {
        direction = apply_circling(direction, input.position, target, input.orbit_side, config);
    }
    direction += agent_separation(input.position, input.agents, config);
    let capped = direction.clamp_length(1.0);
    if capped.is_finite() { capped } else { Vec2::ZERO }
}

/// Per-axis booleans (up, down, left, right) with a deadzone. Screen axes:
/// negative y is up.
pub fn discretize(direction: Vec2, deadzone: f32) -> (bool, bool, bool, bool) {
    (
        direction.y < -deadzone,
        direction.y > deadzone,
        direction.x < -deadzone,
        direction.x > deadzone,
    )
}
