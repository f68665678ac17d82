use thiserror::Error;

use crate::llm::LlmError;
use crate::session::SessionId;

/// Errors from session storage operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by the chat orchestration layer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session '{0}' not found")]
    NotFound(SessionId),

    #[error("model '{0}' is not available")]
    ModelUnavailable(String),

    #[error(transparent)]
    Backend(#[from] LlmError),

    #[error("persistence error: {0}")]
    Persistence(RepositoryError),
}
