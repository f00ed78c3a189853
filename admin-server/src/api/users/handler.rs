//! User API handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use crate::api::CountResponse;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user::{self as user_repo, UserListParams};
use crate::utils::{AppError, AppResult, validate_payload};
use shared::Paginated;
use shared::error::ErrorCode;
use shared::models::{User, UserCreate, UserSummary, UserUpdate};

/// Query parameters for the user listing
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
    #[serde(default = "default_sort_field")]
    sort_by: String,
    #[serde(default = "default_sort_order")]
    order: String,
    #[serde(default)]
    search_name: Option<String>,
    #[serde(default)]
    search_email: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    15
}

fn default_sort_field() -> String {
    "id".to_string()
}

fn default_sort_order() -> String {
    "asc".to_string()
}

impl UserListQuery {
    fn limit(&self) -> u32 {
        self.per_page.clamp(1, 100)
    }

    fn params(&self) -> UserListParams {
        UserListParams {
            search_name: self.search_name.clone(),
            search_email: self.search_email.clone(),
            sort_by: self.sort_by.clone(),
            descending: self.order.eq_ignore_ascii_case("desc"),
            limit: self.limit() as i64,
            offset: (self.page.saturating_sub(1) as i64) * self.limit() as i64,
        }
    }
}

/// GET /api/users - paginated listing with name/email search
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<User>>> {
    let params = query.params();
    let users = user_repo::find_page(&state.pool, &params).await?;
    let total = user_repo::count_filtered(&state.pool, &params).await?;

    Ok(Json(Paginated::new(users, total, query.page, query.limit())))
}

/// GET /api/users/all - id + name pairs for dropdown selections
pub async fn all(State(state): State<ServerState>) -> AppResult<Json<Vec<UserSummary>>> {
    let users = user_repo::find_all_summaries(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/count - total user count for dashboard widgets
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<CountResponse>> {
    let count = user_repo::count(&state.pool).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = user_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        })?;
    Ok(Json(user))
}

/// POST /api/users - create a user
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_payload(&payload)?;

    tracing::info!(
        operator_id = %current_user.id,
        email = %payload.email,
        "Creating user"
    );

    let user = user_repo::create(&state.pool, payload).await?;
    Ok(Json(user))
}

/// PUT /api/users/{id} - update a user
///
/// An empty password field leaves the stored credential untouched.
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    validate_payload(&payload)?;

    // Empty passwords mean "keep"; non-empty ones must meet the minimum
    if let Some(p) = payload.password.as_deref()
        && !p.is_empty()
        && p.len() < 8
    {
        return Err(
            AppError::validation("Validation failed")
                .with_detail("password", "Password must be at least 8 characters"),
        );
    }

    tracing::info!(
        operator_id = %current_user.id,
        user_id = %id,
        "Updating user"
    );

    let user = user_repo::update(&state.pool, id, payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(
        operator_id = %current_user.id,
        user_id = %id,
        "Deleting user"
    );

    let result = user_repo::delete(&state.pool, id).await?;
    Ok(Json(result))
}
