//! Repository error types

use thiserror::Error;

use crate::db::DbError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The caller passed a value the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RepositoryError {
    pub(crate) fn invalid(message: &str) -> Self {
        RepositoryError::InvalidArgument(message.to_string())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RepositoryError::InvalidArgument(_))
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
