//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading, snapshots and
//! the rules themselves so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use character_core::{EquipError, ErrorSeverity, GameError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a character before building")]
    MissingCharacter,

    #[error("runtime requires content to be configured before building")]
    MissingContent,

    #[error(transparent)]
    Equip(#[from] EquipError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Equip(error) => error.severity(),
            RuntimeError::MissingCharacter
            | RuntimeError::MissingContent
            | RuntimeError::Content(_) => ErrorSeverity::Validation,
            RuntimeError::Repository(_) => ErrorSeverity::Internal,
            RuntimeError::Logging(_) => ErrorSeverity::Recoverable,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::MissingCharacter => "RUNTIME_MISSING_CHARACTER",
            RuntimeError::MissingContent => "RUNTIME_MISSING_CONTENT",
            RuntimeError::Equip(error) => error.error_code(),
            RuntimeError::Repository(_) => "RUNTIME_REPOSITORY",
            RuntimeError::Content(_) => "RUNTIME_CONTENT",
            RuntimeError::Logging(_) => "RUNTIME_LOGGING",
        }
    }
}
