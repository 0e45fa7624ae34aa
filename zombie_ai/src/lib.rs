// zombie_ai/src/lib.rs

pub mod core;
pub mod concurrent;
pub mod entities;
pub mod operational;
pub mod systems;
pub mod world;

pub use crate::core::config::AiConfig;
pub use crate::core::error::{AiError, AiResult};
pub use crate::systems::ai::{AgentBody, AiHost, ZombieAI};
pub use crate::world::{HordeWorld, TickReport};
