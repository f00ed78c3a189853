//! User model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User model
///
/// The password hash never leaves the server: it is skipped during
/// serialization and models returned by handlers can be sent as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email_verified_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Minimal user projection for dropdowns and role detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Update user request
///
/// An absent or empty `password` leaves the stored hash untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticated user info, as returned by login and `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Names of assigned roles
    pub roles: Vec<String>,
    /// Effective permission set (direct grants plus role grants)
    pub permissions: Vec<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_user_serializes_without_password_hash() {
        let user = User {
            id: 1,
            name: "Jo".into(),
            email: "jo@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            email_verified_at: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("jo@example.com"));
    }

    #[test]
    fn test_user_create_validation() {
        let valid = UserCreate {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            password: "secret-password".into(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = UserCreate {
            email: "not-an-email".into(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = UserCreate {
            password: "short".into(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_user_update_allows_absent_fields() {
        let update = UserUpdate::default();
        assert!(update.validate().is_ok());
    }
}
