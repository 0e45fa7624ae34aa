// zombie_ai/src/core/error.rs
use crate::core::types::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid geometry for entity {entity}: {detail}")]
    InvalidGeometry { entity: EntityId, detail: String },

    #[error("Unknown or despawned entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type AiResult<T> = Result<T, AiError>;
