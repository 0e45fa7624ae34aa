// zombie_ai/src/core/config.rs
// Tunables for the horde AI. Durations are stored in milliseconds so the
// YAML files stay readable; accessors hand out `Duration`s.
use super::constants::*;
use super::error::{AiError, AiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    pub update_interval_ms: u64,
    pub high_threshold: f32,
    pub medium_threshold: f32,
    pub low_threshold: f32,
    /// Pathfinding interval per level, High..Minimal.
    pub path_intervals_ms: [u64; 4],
    /// Probability of running the state machine on a tick, High..Minimal.
    pub state_update_probability: [f64; 4],
}

impl Default for LodConfig {
    fn default() -> Self {
        LodConfig {
            update_interval_ms: LOD_UPDATE_INTERVAL_MS,
            high_threshold: LOD_HIGH_THRESHOLD,
            medium_threshold: LOD_MEDIUM_THRESHOLD,
            low_threshold: LOD_LOW_THRESHOLD,
            path_intervals_ms: LOD_PATH_INTERVALS_MS,
            state_update_probability: LOD_STATE_UPDATE_PROBABILITY,
        }
    }
}

impl LodConfig {
    pub fn validate(&self) -> AiResult<()> {
        let thresholds = [self.high_threshold, self.medium_threshold, self.low_threshold];
        if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(AiError::Config(format!(
                "LOD thresholds must be positive and finite, got {:?}",
                thresholds
            )));
        }
        if !(self.high_threshold < self.medium_threshold && self.medium_threshold < self.low_threshold) {
            return Err(AiError::Config(format!(
                "LOD thresholds must be strictly increasing (high < medium < low), got high={} medium={} low={}",
                self.high_threshold, self.medium_threshold, self.low_threshold
            )));
        }
        if self.update_interval_ms == 0 {
            return Err(AiError::Config("LOD update interval must be positive".into()));
        }
        if let Some(level) = self.path_intervals_ms.iter().position(|ms| *ms == 0) {
            return Err(AiError::Config(format!("pathfinding interval for LOD level {} must be positive", level)));
        }
        if let Some(p) = self.state_update_probability.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(AiError::Config(format!("state update probability {} outside [0, 1]", p)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub flee_health_threshold: f32,
    pub flee_distance: f32,
    pub aggro_timeout_ms: u64,
    pub target_switch_cooldown_ms: u64,
    pub state_change_cooldown_ms: u64,
    pub wander_radius: f32,
    pub wander_min_radius: f32,
    pub wander_arrival_distance: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            flee_health_threshold: FLEE_HEALTH_THRESHOLD,
            flee_distance: FLEE_DISTANCE,
            aggro_timeout_ms: AGGRO_TIMEOUT_MS,
            target_switch_cooldown_ms: TARGET_SWITCH_COOLDOWN_MS,
            state_change_cooldown_ms: STATE_CHANGE_COOLDOWN_MS,
            wander_radius: WANDER_RADIUS,
            wander_min_radius: WANDER_MIN_RADIUS,
            wander_arrival_distance: WANDER_ARRIVAL_DISTANCE,
        }
    }
}

impl BehaviorConfig {
    pub fn aggro_timeout(&self) -> Duration { Duration::from_millis(self.aggro_timeout_ms) }
    pub fn target_switch_cooldown(&self) -> Duration { Duration::from_millis(self.target_switch_cooldown_ms) }
    pub fn state_change_cooldown(&self) -> Duration { Duration::from_millis(self.state_change_cooldown_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub separation_distance: f32,
    pub avoidance_force: f32,
    pub circling_radius: f32,
    pub circling_timeout_ms: u64,
    pub circling_speed: f32,
    pub circling_orbit_weight: f32,
    pub personal_space: f32,
    pub agent_separation_coefficient: f32,
    pub intent_deadzone: f32,
    pub attack_position_factor: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        SteeringConfig {
            separation_distance: SEPARATION_DISTANCE,
            avoidance_force: AVOIDANCE_FORCE,
            circling_radius: CIRCLING_RADIUS,
            circling_timeout_ms: CIRCLING_TIMEOUT_MS,
            circling_speed: CIRCLING_SPEED,
            circling_orbit_weight: CIRCLING_ORBIT_WEIGHT,
            personal_space: PERSONAL_SPACE,
            agent_separation_coefficient: AGENT_SEPARATION_COEFFICIENT,
            intent_deadzone: INTENT_DEADZONE,
            attack_position_factor: ATTACK_POSITION_FACTOR,
        }
    }
}

impl SteeringConfig {
    pub fn circling_timeout(&self) -> Duration { Duration::from_millis(self.circling_timeout_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    pub arrival_distance: f32,
    pub probe_distance: f32,
    pub probe_half_extent: f32,
    pub step_distance: f32,
    pub deflect_weight: f32,
    pub stuck_threshold: f32,
    pub stuck_timeout_ms: u64,
    pub stuck_escalation_radius: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        PathfindingConfig {
            arrival_distance: PATH_ARRIVAL_DISTANCE,
            probe_distance: PATH_PROBE_DISTANCE,
            probe_half_extent: PATH_PROBE_HALF_EXTENT,
            step_distance: PATH_STEP_DISTANCE,
            deflect_weight: PATH_DEFLECT_WEIGHT,
            stuck_threshold: STUCK_THRESHOLD,
            stuck_timeout_ms: STUCK_TIMEOUT_MS,
            stuck_escalation_radius: STUCK_ESCALATION_RADIUS,
        }
    }
}

impl PathfindingConfig {
    pub fn stuck_timeout(&self) -> Duration { Duration::from_millis(self.stuck_timeout_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub group_radius: f32,
    pub adoption_cooldown_ms: u64,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            group_radius: GROUP_RADIUS,
            adoption_cooldown_ms: PACK_ADOPTION_COOLDOWN_MS,
        }
    }
}

impl PackConfig {
    pub fn adoption_cooldown(&self) -> Duration { Duration::from_millis(self.adoption_cooldown_ms) }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub lod: LodConfig,
    pub behavior: BehaviorConfig,
    pub steering: SteeringConfig,
    pub pathfinding: PathfindingConfig,
    pub pack: PackConfig,
}

impl AiConfig {
    pub fn from_yaml_str(source: &str) -> AiResult<Self> {
        let config: AiConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> AiResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded AI configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects configurations that would make the scheduler or the steering
    /// math meaningless. Called before any world or agent is built.
    pub fn validate(&self) -> AiResult<()> {
        self.lod.validate()?;

        let b = &self.behavior;
        if !(0.0..1.0).contains(&b.flee_health_threshold) {
            return Err(AiError::Config(format!(
                "flee health threshold must be in [0, 1), got {}",
                b.flee_health_threshold
            )));
        }
        if b.wander_min_radius <= 0.0 || b.wander_radius <= b.wander_min_radius {
            return Err(AiError::Config(format!(
                "wander radius ({}) must exceed the minimum wander radius ({}) and both must be positive",
                b.wander_radius, b.wander_min_radius
            )));
        }
        if b.aggro_timeout_ms == 0 {
            return Err(AiError::Config("aggro timeout must be positive".into()));
        }

        let s = &self.steering;
        for (name, value) in [
            ("separation_distance", s.separation_distance),
            ("circling_radius", s.circling_radius),
            ("personal_space", s.personal_space),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AiError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if s.circling_timeout_ms == 0 {
            return Err(AiError::Config("circling timeout must be positive".into()));
        }

        let p = &self.pathfinding;
        if p.stuck_timeout_ms == 0 || p.step_distance <= 0.0 || p.probe_distance <= 0.0 {
            return Err(AiError::Config(
                "pathfinding step, probe distance and stuck timeout must be positive".into(),
            ));
        }

        if self.pack.group_radius <= 0.0 {
            return Err(AiError::Config("group radius must be positive".into()));
        }
        Ok(())
    }
}
