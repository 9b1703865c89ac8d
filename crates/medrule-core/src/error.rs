//! Error types for knowledge-base operations.

use crate::entity::EntityId;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while loading or validating a knowledge base.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(EntityId),

    #[error("Class hierarchy contains a cycle through {0}")]
    CyclicHierarchy(EntityId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
