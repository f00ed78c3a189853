//! Permission model
//!
//! Permissions are guard-scoped leaf entities. Names follow the
//! `"<verb> <subject>"` convention ("view users", "edit content"); the
//! subject token doubles as the display category.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Permission model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub guard: String,
    pub created_at: NaiveDateTime,
}

/// Display category of a permission name: the second whitespace-separated
/// token, or `"general"` for single-token names.
pub fn permission_category(name: &str) -> &str {
    name.split_whitespace().nth(1).unwrap_or("general")
}
