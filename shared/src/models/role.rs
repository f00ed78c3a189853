//! Role model
//!
//! Roles are guard-scoped and tagged with a [`RoleKind`] instead of being
//! special-cased by name. Exactly one role carries `RoleKind::Reserved`:
//! it passes every authorization check, is hidden from listings and cannot
//! be created, renamed or deleted through the management API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserSummary;

/// The single namespace used for role and permission names.
pub const DEFAULT_GUARD: &str = "web";

/// Seeded name of the reserved role. Checks go through [`RoleKind`];
/// the constant exists for seeding and for refusing re-creation.
pub const RESERVED_ROLE_NAME: &str = "super-admin";

/// Role classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RoleKind {
    /// The wildcard role: every authorization check passes
    Reserved,
    /// Seeded roles that may be re-granted but not renamed or deleted
    System,
    /// Operator-managed roles
    Custom,
}

impl RoleKind {
    pub fn is_reserved(&self) -> bool {
        matches!(self, RoleKind::Reserved)
    }

    pub fn is_system(&self) -> bool {
        matches!(self, RoleKind::System)
    }
}

/// Role model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub guard: String,
    pub kind: RoleKind,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    /// Granted permission names, hydrated from the join table
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub permissions: Vec<String>,
}

/// Role detail returned by the show endpoint: the role plus its
/// assigned users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub users: Vec<UserSummary>,
}

/// Create role request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleCreate {
    #[validate(length(min = 1, max = 255, message = "Role name is required"))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Update role request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoleUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Check the role-name charset rule: letters, digits, underscore, hyphen.
pub fn valid_role_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
