pub mod horde_world;

pub use horde_world::{HordeWorld, TickReport};
