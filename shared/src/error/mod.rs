//! Unified error handling
//!
//! All errors carry an [`ErrorCode`] (stable u16, grouped by category
//! ranges), a human-readable message and optional structured details.
//! [`AppError`] converts straight into an axum response via the
//! [`ErrorCode::http_status`] mapping, so handlers can return
//! `AppResult<T>` and use `?` throughout.

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
