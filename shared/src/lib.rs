//! Shared types for the Hive admin backend
//!
//! Common types used across crates: unified error codes, API response
//! structures, domain models and pagination/query types.

pub mod error;
pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use request::ListQuery;
pub use response::Paginated;
