//! Permission service
//!
//! Thin facade over the role/permission repositories: role and
//! permission CRUD, user-role wiring, and the authorization checks.
//! Checks are direct store lookups; there is no cache to invalidate.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::db::repository::{permission as permission_repo, role as role_repo};
use crate::utils::AppResult;
use shared::models::{Permission, Role, RoleCreate, RoleUpdate, permission_category};

/// Facade over the RBAC store
#[derive(Clone)]
pub struct PermissionService {
    pool: SqlitePool,
}

impl PermissionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== Catalog ====================

    /// All roles, the reserved one included
    pub async fn all_roles(&self) -> AppResult<Vec<Role>> {
        Ok(role_repo::find_all(&self.pool).await?)
    }

    /// All permissions, sorted by name
    pub async fn all_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(permission_repo::find_all(&self.pool).await?)
    }

    /// Permission names grouped by display category
    pub async fn grouped_permissions(&self) -> AppResult<BTreeMap<String, Vec<String>>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for permission in permission_repo::find_all(&self.pool).await? {
            grouped
                .entry(permission_category(&permission.name).to_string())
                .or_default()
                .push(permission.name);
        }
        Ok(grouped)
    }

    /// Granted permission names of a role, by role name
    pub async fn permissions_by_role(&self, role_name: &str) -> AppResult<Vec<String>> {
        let role = role_repo::find_by_name(&self.pool, role_name)
            .await?
            .ok_or_else(|| shared::AppError::with_message(
                shared::ErrorCode::RoleNotFound,
                format!("Role '{role_name}' not found"),
            ))?;
        Ok(role.permissions)
    }

    // ==================== Role mutations ====================

    pub async fn create_role(&self, data: RoleCreate) -> AppResult<Role> {
        Ok(role_repo::create(&self.pool, data).await?)
    }

    pub async fn update_role(&self, role_id: i64, data: RoleUpdate) -> AppResult<Role> {
        Ok(role_repo::update(&self.pool, role_id, data).await?)
    }

    /// Replace a role's permission set with exactly the given names
    pub async fn sync_permissions(&self, role_id: i64, names: &[String]) -> AppResult<Role> {
        Ok(role_repo::sync_permissions(&self.pool, role_id, names).await?)
    }

    pub async fn delete_role(&self, role_id: i64) -> AppResult<bool> {
        Ok(role_repo::delete(&self.pool, role_id).await?)
    }

    pub async fn create_permission(&self, name: &str) -> AppResult<Permission> {
        Ok(permission_repo::create(&self.pool, name).await?)
    }

    // ==================== User wiring ====================

    /// Assign roles to a user by name; unknown names are a validation
    /// error
    pub async fn assign_roles_to_user(&self, user_id: i64, roles: &[String]) -> AppResult<()> {
        let ids = self.resolve_role_ids(roles).await?;
        for role_id in ids {
            sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(role_id)
                .execute(&self.pool)
                .await
                .map_err(|e| shared::AppError::database(e.to_string()))?;
        }
        Ok(())
    }

    /// Remove a role from a user by name
    pub async fn remove_role_from_user(&self, user_id: i64, role: &str) -> AppResult<()> {
        sqlx::query(
            "DELETE FROM user_roles WHERE user_id = ? \
             AND role_id IN (SELECT id FROM roles WHERE name = ?)",
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(())
    }

    /// Replace a user's role set with exactly the given names
    pub async fn sync_roles_for_user(&self, user_id: i64, roles: &[String]) -> AppResult<()> {
        let ids = self.resolve_role_ids(roles).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| shared::AppError::database(e.to_string()))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| shared::AppError::database(e.to_string()))?;
        for role_id in ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| shared::AppError::database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(())
    }

    /// Grant permissions directly to a user, bypassing roles
    pub async fn give_permissions_to_user(
        &self,
        user_id: i64,
        permissions: &[String],
    ) -> AppResult<()> {
        let ids = permission_repo::resolve_ids(&self.pool, permissions).await?;
        for permission_id in ids {
            sqlx::query(
                "INSERT OR IGNORE INTO user_permissions (user_id, permission_id) VALUES (?, ?)",
            )
            .bind(user_id)
            .bind(permission_id)
            .execute(&self.pool)
            .await
            .map_err(|e| shared::AppError::database(e.to_string()))?;
        }
        Ok(())
    }

    async fn resolve_role_ids(&self, roles: &[String]) -> AppResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(roles.len());
        for name in roles {
            let role = role_repo::find_by_name(&self.pool, name).await?.ok_or_else(|| {
                shared::AppError::validation(format!("Role '{name}' does not exist"))
            })?;
            ids.push(role.id);
        }
        Ok(ids)
    }

    // ==================== Authorization checks ====================

    /// Names of the user's assigned roles
    pub async fn role_names_of(&self, user_id: i64) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(names)
    }

    /// Effective permission set: direct grants plus grants of every
    /// assigned role
    pub async fn effective_permissions(&self, user_id: i64) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT p.name FROM permissions p \
             JOIN user_permissions up ON up.permission_id = p.id \
             WHERE up.user_id = ?1 \
             UNION \
             SELECT p.name FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             JOIN user_roles ur ON ur.role_id = rp.role_id \
             WHERE ur.user_id = ?1 \
             ORDER BY 1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(names)
    }

    /// Whether any of the user's roles is the reserved role
    pub async fn has_reserved_role(&self, user_id: i64) -> AppResult<bool> {
        let held = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? AND r.kind = 'reserved')",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(held != 0)
    }

    /// Permission check: reserved role short-circuits, otherwise a direct
    /// membership lookup against the effective set
    pub async fn has_permission(&self, user_id: i64, permission: &str) -> AppResult<bool> {
        if self.has_reserved_role(user_id).await? {
            return Ok(true);
        }

        let held = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (\
               SELECT 1 FROM permissions p \
               JOIN user_permissions up ON up.permission_id = p.id \
               WHERE up.user_id = ?1 AND p.name = ?2 \
               UNION \
               SELECT 1 FROM permissions p \
               JOIN role_permissions rp ON rp.permission_id = p.id \
               JOIN user_roles ur ON ur.role_id = rp.role_id \
               WHERE ur.user_id = ?1 AND p.name = ?2)",
        )
        .bind(user_id)
        .bind(permission)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(held != 0)
    }

    /// Role membership check by name
    pub async fn has_role(&self, user_id: i64, role: &str) -> AppResult<bool> {
        let held = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? AND r.name = ?)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
        Ok(held != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use crate::db::repository::user as user_repo;
    use shared::ErrorCode;
    use shared::models::{RESERVED_ROLE_NAME, UserCreate};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> (SqlitePool, PermissionService) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        MIGRATOR.run(&pool).await.expect("migrations");

        let service = PermissionService::new(pool.clone());
        for name in [
            "view users",
            "edit users",
            "delete users",
            "view content",
            "access admin area",
        ] {
            service.create_permission(name).await.unwrap();
        }

        // Reserved and system roles, as the seeder would create them
        sqlx::query("INSERT INTO roles (name, kind) VALUES (?, 'reserved')")
            .bind(RESERVED_ROLE_NAME)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO roles (name, kind) VALUES ('admin', 'system')")
            .execute(&pool)
            .await
            .unwrap();

        (pool, service)
    }

    async fn make_user(pool: &SqlitePool, email: &str) -> i64 {
        user_repo::create(
            pool,
            UserCreate {
                name: email.split('@').next().unwrap_or("user").to_string(),
                email: email.to_string(),
                password: "secret-password".into(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_reserved_role_passes_every_check() {
        let (pool, service) = setup().await;
        let user_id = make_user(&pool, "root@example.com").await;
        service
            .assign_roles_to_user(user_id, &[RESERVED_ROLE_NAME.to_string()])
            .await
            .unwrap();

        assert!(service.has_reserved_role(user_id).await.unwrap());
        assert!(service.has_permission(user_id, "view users").await.unwrap());
        assert!(
            service
                .has_permission(user_id, "some permission that was never created")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_manager_scenario() {
        let (pool, service) = setup().await;

        let role = service
            .create_role(RoleCreate {
                name: "manager".into(),
                permissions: vec!["view users".into(), "edit users".into()],
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(role.permissions, vec!["edit users", "view users"]);

        let user_id = make_user(&pool, "manager@example.com").await;
        service
            .assign_roles_to_user(user_id, &["manager".to_string()])
            .await
            .unwrap();

        assert!(service.has_permission(user_id, "view users").await.unwrap());
        assert!(!service.has_permission(user_id, "delete users").await.unwrap());
        assert!(service.has_role(user_id, "manager").await.unwrap());
        assert!(!service.has_role(user_id, "admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_effective_set_unions_direct_and_role_grants() {
        let (pool, service) = setup().await;

        service
            .create_role(RoleCreate {
                name: "viewer".into(),
                permissions: vec!["view users".into()],
                description: None,
            })
            .await
            .unwrap();

        let user_id = make_user(&pool, "mixed@example.com").await;
        service
            .assign_roles_to_user(user_id, &["viewer".to_string()])
            .await
            .unwrap();
        service
            .give_permissions_to_user(user_id, &["view content".to_string()])
            .await
            .unwrap();

        let effective = service.effective_permissions(user_id).await.unwrap();
        assert_eq!(effective, vec!["view content", "view users"]);
        assert!(service.has_permission(user_id, "view content").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_reserved_role_conflicts() {
        let (_pool, service) = setup().await;
        let err = service
            .create_role(RoleCreate {
                name: RESERVED_ROLE_NAME.into(),
                permissions: vec![],
                description: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleReserved);
    }

    #[tokio::test]
    async fn test_sync_permissions_leaves_no_residue() {
        let (_pool, service) = setup().await;

        let role = service
            .create_role(RoleCreate {
                name: "shift".into(),
                permissions: vec!["view users".into(), "edit users".into()],
                description: None,
            })
            .await
            .unwrap();

        let synced = service
            .sync_permissions(role.id, &["view content".to_string()])
            .await
            .unwrap();
        assert_eq!(synced.permissions, vec!["view content"]);

        let unchanged = service
            .sync_permissions(role.id, &["view content".to_string()])
            .await
            .unwrap();
        assert_eq!(unchanged.permissions, vec!["view content"]);
    }

    #[tokio::test]
    async fn test_sync_permissions_refused_on_reserved_role() {
        let (pool, service) = setup().await;
        let reserved_id: i64 =
            sqlx::query_scalar("SELECT id FROM roles WHERE kind = 'reserved'")
                .fetch_one(&pool)
                .await
                .unwrap();

        let err = service
            .sync_permissions(reserved_id, &["view users".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleReserved);
    }

    #[tokio::test]
    async fn test_delete_role_with_users_conflicts() {
        let (pool, service) = setup().await;

        let role = service
            .create_role(RoleCreate {
                name: "occupied".into(),
                permissions: vec![],
                description: None,
            })
            .await
            .unwrap();
        let user_id = make_user(&pool, "member@example.com").await;
        service
            .assign_roles_to_user(user_id, &["occupied".to_string()])
            .await
            .unwrap();

        let err = service.delete_role(role.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleHasUsers);

        // Removing the user unblocks deletion
        service
            .remove_role_from_user(user_id, "occupied")
            .await
            .unwrap();
        assert!(service.delete_role(role.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_system_role_rename_is_ignored() {
        let (pool, service) = setup().await;
        let admin_id: i64 = sqlx::query_scalar("SELECT id FROM roles WHERE name = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();

        let updated = service
            .update_role(
                admin_id,
                RoleUpdate {
                    name: Some("renamed".into()),
                    permissions: Some(vec!["view users".into()]),
                    description: None,
                },
            )
            .await
            .unwrap();

        // Name preserved, permission sync applied
        assert_eq!(updated.name, "admin");
        assert_eq!(updated.permissions, vec!["view users"]);
    }

    #[tokio::test]
    async fn test_sync_roles_for_user_replaces_set() {
        let (pool, service) = setup().await;
        for name in ["alpha", "beta"] {
            service
                .create_role(RoleCreate {
                    name: name.into(),
                    permissions: vec![],
                    description: None,
                })
                .await
                .unwrap();
        }

        let user_id = make_user(&pool, "roles@example.com").await;
        service
            .assign_roles_to_user(user_id, &["alpha".to_string()])
            .await
            .unwrap();
        service
            .sync_roles_for_user(user_id, &["beta".to_string()])
            .await
            .unwrap();

        assert_eq!(service.role_names_of(user_id).await.unwrap(), vec!["beta"]);
    }

    #[tokio::test]
    async fn test_grouped_permissions() {
        let (_pool, service) = setup().await;
        let grouped = service.grouped_permissions().await.unwrap();

        assert_eq!(
            grouped.get("users"),
            Some(&vec![
                "delete users".to_string(),
                "edit users".to_string(),
                "view users".to_string()
            ])
        );
        assert_eq!(grouped.get("content"), Some(&vec!["view content".to_string()]));
        // "access admin area" groups under its second token
        assert_eq!(grouped.get("admin"), Some(&vec!["access admin area".to_string()]));
    }

    #[tokio::test]
    async fn test_catalog_listings_include_reserved_role() {
        let (_pool, service) = setup().await;

        let roles = service.all_roles().await.unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&RESERVED_ROLE_NAME));
        assert!(names.contains(&"admin"));

        let permissions = service.all_permissions().await.unwrap();
        assert_eq!(permissions.len(), 5);
        // Sorted by name
        assert_eq!(permissions[0].name, "access admin area");
    }

    #[tokio::test]
    async fn test_permissions_by_role() {
        let (_pool, service) = setup().await;
        service
            .create_role(RoleCreate {
                name: "auditor".into(),
                permissions: vec!["view users".into()],
                description: None,
            })
            .await
            .unwrap();

        let names = service.permissions_by_role("auditor").await.unwrap();
        assert_eq!(names, vec!["view users"]);

        let err = service.permissions_by_role("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
    }
}
