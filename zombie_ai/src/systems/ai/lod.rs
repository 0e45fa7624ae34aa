// zombie_ai/src/systems/ai/lod.rs
//
// Distance-based level of detail. Far-away zombies think less often: their
// pathfinding runs on a longer interval and their state machine is skipped
// stochastically so agents in the same tier do not all recompute together.

use crate::core::config::LodConfig;
use crate::core::error::AiResult;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LodLevel {
    High = 0,
    Medium = 1,
    Low = 2,
    Minimal = 3,
}

impl LodLevel {
    pub const ALL: [LodLevel; 4] = [LodLevel::High, LodLevel::Medium, LodLevel::Low, LodLevel::Minimal];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LodLevel::High => "high",
            LodLevel::Medium => "medium",
            LodLevel::Low => "low",
            LodLevel::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LodScheduler {
    config: LodConfig,
}

impl LodScheduler {
    /// Fails with a configuration error unless thresholds are strictly
    /// increasing and every interval is positive.
    pub fn new(config: LodConfig) -> AiResult<Self> {
        config.validate()?;
        Ok(LodScheduler { config })
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.config.update_interval_ms)
    }

    /// `None` (no player at all), NaN and infinity classify as Minimal.
    pub fn classify(&self, distance: f32) -> LodLevel {
        if !distance.is_finite() {
            LodLevel::Minimal
        } else if distance <= self.config.high_threshold {
            LodLevel::High
        } else if distance <= self.config.medium_threshold {
            LodLevel::Medium
        } else if distance <= self.config.low_threshold {
            LodLevel::Low
        } else {
            LodLevel::Minimal
        }
    }

    pub fn pathfinding_interval(&self, level: LodLevel) -> Duration {
        Duration::from_millis(self.config.path_intervals_ms[level as usize])
    }

    pub fn state_update_probability(&self, level: LodLevel) -> f64 {
        self.config.state_update_probability[level as usize]
    }

    /// Independent per-agent draw; the caller owns the RNG.
    pub fn should_update_state(&self, level: LodLevel, rng: &mut impl Rng) -> bool {
        let p = self.state_update_probability(level);
        if p >= 1.0 {
            true
        } else if p <= 0.0 {
            false
        } else {
            rng.gen_bool(p)
        }
    }

    /// True when at least `interval` has elapsed since `last`, or there has
    /// been no previous run.
    pub fn is_due(last: Option<Duration>, now: Duration, interval: Duration) -> bool {
        match last {
            None => true,
            Some(last) => now.saturating_sub(last) >= interval,
        }
    }

    pub fn lod_update_due(&self, last: Option<Duration>, now: Duration) -> bool {
        Self::is_due(last, now, self.update_interval())
    }
}
