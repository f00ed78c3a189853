//! Utility module
//!
//! - Error types re-exported from `shared::error`
//! - Logging setup
//! - Request payload validation

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use validation::validate_payload;
