//! Domain models and request/response DTOs
//!
//! Models derive `sqlx::FromRow` behind the `db` feature so API clients
//! can use the same types without pulling in the database stack.

pub mod contact;
pub mod permission;
pub mod role;
pub mod user;

pub use contact::ContactMessage;
pub use permission::{Permission, permission_category};
pub use role::{
    DEFAULT_GUARD, RESERVED_ROLE_NAME, Role, RoleCreate, RoleDetail, RoleKind, RoleUpdate,
    valid_role_name,
};
pub use user::{
    LoginRequest, LoginResponse, User, UserCreate, UserInfo, UserSummary, UserUpdate,
};
