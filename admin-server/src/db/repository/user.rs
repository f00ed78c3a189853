//! User repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use shared::error::ErrorCode;
use shared::models::{User, UserCreate, UserSummary, UserUpdate};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, email_verified_at, created_at, updated_at";

/// Filtering, sorting and paging parameters for the user listing
#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    pub search_name: Option<String>,
    pub search_email: Option<String>,
    pub sort_by: String,
    pub descending: bool,
    pub limit: i64,
    pub offset: i64,
}

/// Map a requested sort field onto a real column; anything unknown
/// falls back to id
fn sort_column(requested: &str) -> &'static str {
    match requested {
        "name" => "name",
        "email" => "email",
        "created_at" => "created_at",
        _ => "id",
    }
}

fn like_pattern(term: &Option<String>) -> Option<String> {
    term.as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| format!("%{t}%"))
}

pub async fn find_page(pool: &SqlitePool, params: &UserListParams) -> RepoResult<Vec<User>> {
    let order = if params.descending { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users \
         WHERE (?1 IS NULL OR name LIKE ?1) AND (?2 IS NULL OR email LIKE ?2) \
         ORDER BY {} {order} LIMIT ?3 OFFSET ?4",
        sort_column(&params.sort_by)
    );

    let users = sqlx::query_as::<_, User>(&sql)
        .bind(like_pattern(&params.search_name))
        .bind(like_pattern(&params.search_email))
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn count_filtered(pool: &SqlitePool, params: &UserListParams) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users \
         WHERE (?1 IS NULL OR name LIKE ?1) AND (?2 IS NULL OR email LIKE ?2)",
    )
    .bind(like_pattern(&params.search_name))
    .bind(like_pattern(&params.search_email))
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// All users as id + name pairs, for dropdown selections
pub async fn find_all_summaries(pool: &SqlitePool) -> RepoResult<Vec<UserSummary>> {
    let users =
        sqlx::query_as::<_, UserSummary>("SELECT id, name FROM users ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    // Check duplicate email
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::EmailTaken,
            format!("Email '{}' is already in use", data.email),
        ));
    }

    // Hash password before persistence
    let password_hash = password::hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found")))?;

    // Check duplicate email if changing
    if let Some(ref new_email) = data.email
        && new_email != &existing.email
        && find_by_email(pool, new_email).await?.is_some()
    {
        return Err(RepoError::Business(
            ErrorCode::EmailTaken,
            format!("Email '{new_email}' is already in use"),
        ));
    }

    // Empty or absent password leaves the stored hash untouched
    let password_hash = match data.password.as_deref() {
        Some(p) if !p.is_empty() => Some(
            password::hash_password(p)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        _ => None,
    };

    let rows = sqlx::query(
        "UPDATE users SET name = COALESCE(?1, name), email = COALESCE(?2, email), \
         password_hash = COALESCE(?3, password_hash), updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Hard delete; grant and assignment rows cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found")))?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        MIGRATOR.run(&pool).await.expect("migrations");
        pool
    }

    fn jo() -> UserCreate {
        UserCreate {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            password: "secret-password".into(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let pool = test_pool().await;
        let user = create(&pool, jo()).await.unwrap();

        assert_ne!(user.password_hash, "secret-password");
        assert!(
            password::verify_password("secret-password", &user.password_hash).unwrap()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = test_pool().await;
        create(&pool, jo()).await.unwrap();

        let err = create(&pool, jo()).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::EmailTaken, _)
        ));
    }

    #[tokio::test]
    async fn test_update_with_empty_password_keeps_hash() {
        let pool = test_pool().await;
        let user = create(&pool, jo()).await.unwrap();
        let original_hash = user.password_hash.clone();

        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                name: Some("Joanna".into()),
                email: None,
                password: Some(String::new()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Joanna");
        assert_eq!(updated.password_hash, original_hash);
    }

    #[tokio::test]
    async fn test_update_with_new_password_rehashes() {
        let pool = test_pool().await;
        let user = create(&pool, jo()).await.unwrap();

        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                password: Some("another-password".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_ne!(updated.password_hash, user.password_hash);
        assert!(
            password::verify_password("another-password", &updated.password_hash).unwrap()
        );
    }

    #[tokio::test]
    async fn test_page_filtering_and_sorting() {
        let pool = test_pool().await;
        for (name, email) in [
            ("Alice", "alice@example.com"),
            ("Bob", "bob@example.com"),
            ("Carol", "carol@elsewhere.org"),
        ] {
            create(
                &pool,
                UserCreate {
                    name: name.into(),
                    email: email.into(),
                    password: "secret-password".into(),
                },
            )
            .await
            .unwrap();
        }

        let params = UserListParams {
            search_email: Some("example.com".into()),
            sort_by: "name".into(),
            descending: true,
            limit: 10,
            offset: 0,
            ..Default::default()
        };
        let page = find_page(&pool, &params).await.unwrap();
        let names: Vec<_> = page.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);
        assert_eq!(count_filtered(&pool, &params).await.unwrap(), 2);
        assert_eq!(count(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let user = create(&pool, jo()).await.unwrap();

        assert!(delete(&pool, user.id).await.unwrap());
        assert!(find_by_id(&pool, user.id).await.unwrap().is_none());

        let err = delete(&pool, user.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::UserNotFound, _)
        ));
    }
}
