pub mod behavior;
pub mod host;
pub mod lod;
pub mod pack;
pub mod pathfinding;
pub mod steering;
pub mod tactics;
pub mod targeting;
pub mod zombie_ai;

pub use host::AiHost;
pub use lod::{LodLevel, LodScheduler};
pub use zombie_ai::{AgentBody, AiSettings, ZombieAI};
