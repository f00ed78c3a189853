//! Authentication and authorization
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - request-scoped user context (identity, roles,
//!   effective permission set)
//! - [`require_auth`] - authentication middleware
//! - [`require_any_permission`] / [`require_role_or_permission`] -
//!   authorization gates

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod user;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_any_permission, require_auth, require_role_or_permission};
pub use user::CurrentUser;
