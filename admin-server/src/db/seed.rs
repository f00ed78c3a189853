//! Startup seed data
//!
//! Idempotent: creates the permission catalog, the reserved role, the
//! system roles with their default grants and one superuser. Existing
//! rows are left untouched.

use sqlx::SqlitePool;

use crate::auth::password;
use crate::core::Config;
use crate::utils::{AppError, AppResult};
use shared::models::{DEFAULT_GUARD, RESERVED_ROLE_NAME};

/// Permission catalog, grouped the way the management UI displays it
const PERMISSIONS: &[&str] = &[
    // User management
    "view users",
    "create users",
    "edit users",
    "delete users",
    // Role management
    "view roles",
    "create roles",
    "edit roles",
    "delete roles",
    "assign roles",
    // Content management
    "view content",
    "create content",
    "edit content",
    "delete content",
    "publish content",
    // System
    "access admin area",
    "manage settings",
    "view logs",
    "manage system",
];

/// System roles and their default grants. The admin role gets the whole
/// catalog.
const MANAGER_PERMISSIONS: &[&str] = &[
    "view users",
    "view content",
    "create content",
    "edit content",
    "publish content",
    "access admin area",
];

const USER_PERMISSIONS: &[&str] = &["view content"];

/// Run the seed. Safe to call on every startup.
pub async fn run(pool: &SqlitePool, config: &Config) -> AppResult<()> {
    seed_permissions(pool).await?;
    seed_roles(pool).await?;
    seed_superuser(pool, config).await?;
    Ok(())
}

async fn seed_permissions(pool: &SqlitePool) -> AppResult<()> {
    for name in PERMISSIONS {
        sqlx::query("INSERT OR IGNORE INTO permissions (name, guard) VALUES (?, ?)")
            .bind(name)
            .bind(DEFAULT_GUARD)
            .execute(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed permission: {e}")))?;
    }
    Ok(())
}

async fn seed_roles(pool: &SqlitePool) -> AppResult<()> {
    let roles: &[(&str, &str, &str)] = &[
        (
            RESERVED_ROLE_NAME,
            "reserved",
            "Unrestricted access, hidden from management",
        ),
        ("admin", "system", "Administrator with system-wide access"),
        ("manager", "system", "Manager with department-level access"),
        ("user", "system", "Regular user with limited access"),
    ];

    for (name, kind, description) in roles {
        sqlx::query(
            "INSERT OR IGNORE INTO roles (name, guard, kind, description) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(DEFAULT_GUARD)
        .bind(kind)
        .bind(description)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to seed role: {e}")))?;
    }

    // Default grants; the reserved role needs none
    grant(pool, "admin", PERMISSIONS).await?;
    grant(pool, "manager", MANAGER_PERMISSIONS).await?;
    grant(pool, "user", USER_PERMISSIONS).await?;
    Ok(())
}

async fn grant(pool: &SqlitePool, role: &str, permissions: &[&str]) -> AppResult<()> {
    for permission in permissions {
        sqlx::query(
            "INSERT OR IGNORE INTO role_permissions (role_id, permission_id) \
             SELECT r.id, p.id FROM roles r, permissions p \
             WHERE r.name = ? AND p.name = ?",
        )
        .bind(role)
        .bind(permission)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to seed role grant: {e}")))?;
    }
    Ok(())
}

async fn seed_superuser(pool: &SqlitePool, config: &Config) -> AppResult<()> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(&config.admin_email)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check superuser: {e}")))?;

    if existing == 0 {
        if config.admin_password == "password123" {
            tracing::warn!(
                email = %config.admin_email,
                "Seeding superuser with the default password, set ADMIN_PASSWORD"
            );
        }

        let hash = password::hash_password(&config.admin_password)
            .map_err(|e| AppError::internal(format!("Failed to hash superuser password: {e}")))?;

        sqlx::query(
            "INSERT INTO users (name, email, password_hash, email_verified_at) \
             VALUES ('Super Admin', ?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(&config.admin_email)
        .bind(&hash)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to seed superuser: {e}")))?;

        tracing::info!(email = %config.admin_email, "Superuser created");
    }

    // Ensure the reserved role is assigned even on pre-existing users
    sqlx::query(
        "INSERT OR IGNORE INTO user_roles (user_id, role_id) \
         SELECT u.id, r.id FROM users u, roles r WHERE u.email = ? AND r.name = ?",
    )
    .bind(&config.admin_email)
    .bind(RESERVED_ROLE_NAME)
    .execute(pool)
    .await
    .map_err(|e| AppError::database(format!("Failed to assign reserved role: {e}")))?;

    Ok(())
}
