//! Error types raised by repository implementations.

use thiserror::Error;

use character_core::CreatureId;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("snapshot repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot for {expected} holds character {found}")]
    CharacterMismatch {
        expected: CreatureId,
        found: CreatureId,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
