// zombie_ai/src/core/constants.rs
use std::time::Duration;

pub const SIMULATION_TICK_RATE: u64 = 30;
pub const TICK_DURATION_MS: u64 = 1000 / SIMULATION_TICK_RATE;
pub const TICK_DURATION: Duration = Duration::from_millis(TICK_DURATION_MS);

// World constants (reference host)
pub const WORLD_MIN_X: f32 = -200.0;
pub const WORLD_MAX_X: f32 = 200.0;
pub const WORLD_MIN_Y: f32 = -200.0;
pub const WORLD_MAX_Y: f32 = 200.0;
pub const SPATIAL_INDEX_CELL_SIZE: f32 = 10.0;

// LOD
pub const LOD_UPDATE_INTERVAL_MS: u64 = 1000;
pub const LOD_HIGH_THRESHOLD: f32 = 25.0;
pub const LOD_MEDIUM_THRESHOLD: f32 = 50.0;
pub const LOD_LOW_THRESHOLD: f32 = 75.0;
pub const LOD_PATH_INTERVALS_MS: [u64; 4] = [500, 1000, 2000, 5000];
pub const LOD_STATE_UPDATE_PROBABILITY: [f64; 4] = [1.0, 1.0, 0.7, 0.3];

// Behavior
pub const FLEE_HEALTH_THRESHOLD: f32 = 0.2;
pub const FLEE_DISTANCE: f32 = 20.0;
pub const AGGRO_TIMEOUT_MS: u64 = 10_000;
pub const TARGET_SWITCH_COOLDOWN_MS: u64 = 2_000;
pub const STATE_CHANGE_COOLDOWN_MS: u64 = 500;
pub const WANDER_RADIUS: f32 = 15.0;
pub const WANDER_MIN_RADIUS: f32 = 5.0;
pub const WANDER_ARRIVAL_DISTANCE: f32 = 1.0;

// Steering
pub const SEPARATION_DISTANCE: f32 = 3.5;
pub const AVOIDANCE_FORCE: f32 = 1.5;
pub const CIRCLING_RADIUS: f32 = 4.0;
pub const CIRCLING_TIMEOUT_MS: u64 = 5_000;
pub const CIRCLING_SPEED: f32 = 0.3;
pub const CIRCLING_ORBIT_WEIGHT: f32 = 0.7;
pub const PERSONAL_SPACE: f32 = 2.0;
pub const AGENT_SEPARATION_COEFFICIENT: f32 = 0.5;
pub const INTENT_DEADZONE: f32 = 0.1;
pub const ATTACK_POSITION_FACTOR: f32 = 0.8;

// Pathfinding / stuck recovery
pub const PATH_ARRIVAL_DISTANCE: f32 = 0.5;
pub const PATH_PROBE_DISTANCE: f32 = 5.0;
pub const PATH_PROBE_HALF_EXTENT: f32 = 2.0;
pub const PATH_STEP_DISTANCE: f32 = 3.0;
pub const PATH_DEFLECT_WEIGHT: f32 = 0.5;
pub const STUCK_THRESHOLD: f32 = 1.0;
pub const STUCK_TIMEOUT_MS: u64 = 3_000;
pub const STUCK_ESCALATION_RADIUS: f32 = 0.5;

// Pack
pub const GROUP_RADIUS: f32 = 10.0;
pub const PACK_ADOPTION_COOLDOWN_MS: u64 = 1_000;

// Host
pub const DEFAULT_WORLD_SEED: u64 = 0x5eed_2024;
pub const ZOMBIE_RADIUS: f32 = 0.5;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
