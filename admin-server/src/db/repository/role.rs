//! Role repository
//!
//! Role rows plus their permission grants. The reserved role is excluded
//! from listings and refuses every mutation; system roles keep their
//! name and cannot be deleted.

use super::{RepoError, RepoResult, permission};
use shared::error::ErrorCode;
use shared::models::{
    DEFAULT_GUARD, RESERVED_ROLE_NAME, Role, RoleCreate, RoleUpdate, UserSummary,
    valid_role_name,
};
use sqlx::SqlitePool;

const ROLE_COLUMNS: &str = "id, name, guard, kind, description, created_at";

/// Search, sorting and paging parameters for the role listing
#[derive(Debug, Clone, Default)]
pub struct RoleListParams {
    pub search: Option<String>,
    pub sort_by: String,
    pub descending: bool,
    pub limit: i64,
    pub offset: i64,
}

fn sort_column(requested: &str) -> &'static str {
    match requested {
        "name" => "name",
        "created_at" => "created_at",
        _ => "id",
    }
}

/// Fill in the granted permission names for a role row
async fn hydrate(pool: &SqlitePool, mut role: Role) -> RepoResult<Role> {
    role.permissions = permissions_of(pool, role.id).await?;
    Ok(role)
}

/// Granted permission names of a role, sorted
pub async fn permissions_of(pool: &SqlitePool, role_id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT p.name FROM permissions p \
         JOIN role_permissions rp ON rp.permission_id = p.id \
         WHERE rp.role_id = ? ORDER BY p.name",
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Every role, the reserved one included, hydrated and sorted by name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(&format!(
        "SELECT {ROLE_COLUMNS} FROM roles ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    let mut hydrated = Vec::with_capacity(roles.len());
    for role in roles {
        hydrated.push(hydrate(pool, role).await?);
    }
    Ok(hydrated)
}

/// Page of roles, reserved role hidden
pub async fn find_page(pool: &SqlitePool, params: &RoleListParams) -> RepoResult<Vec<Role>> {
    let order = if params.descending { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT {ROLE_COLUMNS} FROM roles \
         WHERE kind != 'reserved' AND (?1 IS NULL OR name LIKE ?1) \
         ORDER BY {} {order} LIMIT ?2 OFFSET ?3",
        sort_column(&params.sort_by)
    );

    let pattern = params
        .search
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let roles = sqlx::query_as::<_, Role>(&sql)
        .bind(pattern)
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(pool)
        .await?;

    let mut hydrated = Vec::with_capacity(roles.len());
    for role in roles {
        hydrated.push(hydrate(pool, role).await?);
    }
    Ok(hydrated)
}

/// Count of roles visible in listings (reserved excluded)
pub async fn count_visible(pool: &SqlitePool, search: Option<&str>) -> RepoResult<i64> {
    let pattern = search.filter(|s| !s.is_empty()).map(|s| format!("%{s}%"));
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM roles WHERE kind != 'reserved' AND (?1 IS NULL OR name LIKE ?1)",
    )
    .bind(pattern)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(&format!(
        "SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match role {
        Some(role) => Ok(Some(hydrate(pool, role).await?)),
        None => Ok(None),
    }
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(&format!(
        "SELECT {ROLE_COLUMNS} FROM roles WHERE name = ? AND guard = ? LIMIT 1"
    ))
    .bind(name)
    .bind(DEFAULT_GUARD)
    .fetch_optional(pool)
    .await?;

    match role {
        Some(role) => Ok(Some(hydrate(pool, role).await?)),
        None => Ok(None),
    }
}

/// Users assigned to a role
pub async fn users_of(pool: &SqlitePool, role_id: i64) -> RepoResult<Vec<UserSummary>> {
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT u.id, u.name FROM users u \
         JOIN user_roles ur ON ur.user_id = u.id \
         WHERE ur.role_id = ? ORDER BY u.name",
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn user_count(pool: &SqlitePool, role_id: i64) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE role_id = ?")
            .bind(role_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

fn validate_name(name: &str) -> RepoResult<()> {
    if !valid_role_name(name) {
        return Err(RepoError::Validation(
            "Role name can only contain letters, numbers, underscores, and hyphens".into(),
        ));
    }
    if name == RESERVED_ROLE_NAME {
        return Err(RepoError::Business(
            ErrorCode::RoleReserved,
            format!("Cannot create role '{RESERVED_ROLE_NAME}'"),
        ));
    }
    Ok(())
}

/// Create a custom role and grant the listed permissions atomically
pub async fn create(pool: &SqlitePool, data: RoleCreate) -> RepoResult<Role> {
    validate_name(&data.name)?;

    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::RoleNameExists,
            format!("Role '{}' already exists", data.name),
        ));
    }

    // Unknown permission names fail the whole operation
    let permission_ids = permission::resolve_ids(pool, &data.permissions).await?;

    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO roles (name, guard, kind, description) VALUES (?, ?, 'custom', ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(DEFAULT_GUARD)
    .bind(&data.description)
    .fetch_one(&mut *tx)
    .await?;

    for permission_id in &permission_ids {
        sqlx::query("INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
            .bind(id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create role".into()))
}

/// Update a role's name, description and/or permission set
///
/// Renames of system roles are ignored (the original name is preserved);
/// the reserved role refuses any update.
pub async fn update(pool: &SqlitePool, id: i64, data: RoleUpdate) -> RepoResult<Role> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))?;

    if existing.kind.is_reserved() {
        return Err(RepoError::Business(
            ErrorCode::RoleReserved,
            "Cannot modify the reserved role".into(),
        ));
    }

    let new_name = match data.name {
        Some(ref name) if name != &existing.name => {
            if existing.kind.is_system() {
                tracing::warn!(
                    role = %existing.name,
                    requested = %name,
                    "Ignoring rename of system role"
                );
                None
            } else {
                validate_name(name)?;
                if find_by_name(pool, name).await?.is_some() {
                    return Err(RepoError::Business(
                        ErrorCode::RoleNameExists,
                        format!("Role '{name}' already exists"),
                    ));
                }
                Some(name.clone())
            }
        }
        _ => None,
    };

    let permission_ids = match data.permissions {
        Some(ref names) => Some(permission::resolve_ids(pool, names).await?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE roles SET name = COALESCE(?1, name), description = COALESCE(?2, description) \
         WHERE id = ?3",
    )
    .bind(&new_name)
    .bind(&data.description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(ids) = permission_ids {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for permission_id in ids {
            sqlx::query("INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
                .bind(id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {id} not found")))
}

/// Replace the role's entire permission set with exactly the given names
pub async fn sync_permissions(
    pool: &SqlitePool,
    id: i64,
    names: &[String],
) -> RepoResult<Role> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))?;

    if existing.kind.is_reserved() {
        return Err(RepoError::Business(
            ErrorCode::RoleReserved,
            "Cannot modify the reserved role".into(),
        ));
    }

    let permission_ids = permission::resolve_ids(pool, names).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for permission_id in permission_ids {
        sqlx::query("INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
            .bind(id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {id} not found")))
}

/// Delete a role
///
/// Refused for the reserved role, for system roles and for roles with
/// assigned users.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))?;

    if existing.kind.is_reserved() {
        return Err(RepoError::Business(
            ErrorCode::RoleReserved,
            "Cannot delete the reserved role".into(),
        ));
    }
    if existing.kind.is_system() {
        return Err(RepoError::Business(
            ErrorCode::RoleIsSystem,
            format!("Cannot delete system role '{}'", existing.name),
        ));
    }

    let assigned = user_count(pool, id).await?;
    if assigned > 0 {
        return Err(RepoError::Business(
            ErrorCode::RoleHasUsers,
            format!(
                "Cannot delete role '{}' because it has {assigned} user(s) assigned",
                existing.name
            ),
        ));
    }

    sqlx::query("DELETE FROM roles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
