//! Role API handlers

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use crate::api::CountResponse;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::role::{self as role_repo, RoleListParams};
use crate::utils::{AppError, AppResult, validate_payload};
use shared::error::ErrorCode;
use shared::models::{Role, RoleCreate, RoleDetail, RoleUpdate};
use shared::{ListQuery, Paginated};

/// POST /api/roles/{id}/sync-permissions payload
#[derive(Debug, Deserialize)]
pub struct SyncPermissionsRequest {
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// GET /api/roles - paginated listing, reserved role hidden
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Role>>> {
    let params = RoleListParams {
        search: query.search.clone(),
        sort_by: query.sort_by.clone(),
        descending: query.is_descending(),
        limit: query.limit() as i64,
        offset: query.offset() as i64,
    };

    let roles = role_repo::find_page(&state.pool, &params).await?;
    let total = role_repo::count_visible(&state.pool, query.search.as_deref()).await?;

    Ok(Json(Paginated::new(roles, total, query.page, query.limit())))
}

/// GET /api/roles/count - manageable role count (reserved excluded)
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<CountResponse>> {
    let count = role_repo::count_visible(&state.pool, None).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/roles/{id} - role with permissions and assigned users
///
/// The reserved role is not addressable here; asking for it returns 404
/// as if it did not exist.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleDetail>> {
    let role = role_repo::find_by_id(&state.pool, id)
        .await?
        .filter(|r| !r.kind.is_reserved())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RoleNotFound, format!("Role {id} not found"))
        })?;

    let users = role_repo::users_of(&state.pool, role.id).await?;
    Ok(Json(RoleDetail { role, users }))
}

/// POST /api/roles - create a role with its permission grants
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    validate_payload(&payload)?;

    tracing::info!(
        operator_id = %current_user.id,
        role_name = %payload.name,
        "Creating role"
    );

    let role = state.permissions().create_role(payload).await?;
    Ok(Json(role))
}

/// PUT /api/roles/{id} - rename and/or replace permissions
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    validate_payload(&payload)?;

    tracing::info!(
        operator_id = %current_user.id,
        role_id = %id,
        "Updating role"
    );

    let role = state.permissions().update_role(id, payload).await?;
    Ok(Json(role))
}

/// DELETE /api/roles/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(
        operator_id = %current_user.id,
        role_id = %id,
        "Deleting role"
    );

    let result = state.permissions().delete_role(id).await?;
    Ok(Json(result))
}

/// POST /api/roles/{id}/sync-permissions - replace the whole grant set
pub async fn sync_permissions(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SyncPermissionsRequest>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        operator_id = %current_user.id,
        role_id = %id,
        permissions = ?payload.permissions,
        "Syncing role permissions"
    );

    let role = state
        .permissions()
        .sync_permissions(id, &payload.permissions)
        .await?;
    Ok(Json(role))
}

/// GET /api/permissions - the catalog grouped by display category
pub async fn all_permissions(
    State(state): State<ServerState>,
) -> AppResult<Json<BTreeMap<String, Vec<String>>>> {
    let grouped = state.permissions().grouped_permissions().await?;
    Ok(Json(grouped))
}
