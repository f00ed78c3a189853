//! Repository module
//!
//! Function-style CRUD operations per table over the shared pool.

pub mod permission;
pub mod role;
pub mod user;

use shared::error::ErrorCode;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violation carrying its own error code
    #[error("{1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => Self::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => Self::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => Self::database(msg),
            RepoError::Validation(msg) => Self::validation(msg),
            RepoError::Business(code, msg) => Self::with_message(code, msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
