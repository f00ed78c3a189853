//! Permission repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{DEFAULT_GUARD, Permission};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Permission>> {
    let permissions = sqlx::query_as::<_, Permission>(
        "SELECT id, name, guard, created_at FROM permissions ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(permissions)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Permission>> {
    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, guard, created_at FROM permissions WHERE name = ? AND guard = ? LIMIT 1",
    )
    .bind(name)
    .bind(DEFAULT_GUARD)
    .fetch_optional(pool)
    .await?;
    Ok(permission)
}

pub async fn create(pool: &SqlitePool, name: &str) -> RepoResult<Permission> {
    if find_by_name(pool, name).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::PermissionNameExists,
            format!("Permission '{name}' already exists"),
        ));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO permissions (name, guard) VALUES (?, ?) RETURNING id",
    )
    .bind(name)
    .bind(DEFAULT_GUARD)
    .fetch_one(pool)
    .await?;

    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, guard, created_at FROM permissions WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(permission)
}

/// Resolve permission names to ids, in input order
///
/// A name with no matching permission is a validation error, never
/// silently skipped.
pub async fn resolve_ids(pool: &SqlitePool, names: &[String]) -> RepoResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM permissions WHERE name = ? AND guard = ?",
        )
        .bind(name)
        .bind(DEFAULT_GUARD)
        .fetch_optional(pool)
        .await?;

        match id {
            Some(id) => ids.push(id),
            None => {
                return Err(RepoError::Validation(format!(
                    "Permission '{name}' does not exist"
                )));
            }
        }
    }
    Ok(ids)
}
