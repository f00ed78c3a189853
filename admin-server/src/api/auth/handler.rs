//! Authentication handlers
//!
//! Login, logout and current-user info.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - authenticate and issue a token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = user_repo::find_by_email(&state.pool, &req.email)
        .await
        .map_err(AppError::from)?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(user) => {
            let password_valid = password::verify_password(&req.password, &user.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            user
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(user.id, &user.name, &user.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let permissions = state.permissions();
    let roles = permissions.role_names_of(user.id).await?;
    let effective = permissions.effective_permissions(user.id).await?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            roles,
            permissions: effective,
        },
    }))
}

/// GET /api/auth/me - current user info
pub async fn me(Extension(user): Extension<CurrentUser>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        roles: user.roles,
        permissions: user.permissions,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; logout is a client-side discard, logged here
/// for the audit trail.
pub async fn logout(Extension(user): Extension<CurrentUser>) -> AppResult<Json<ApiResponse<()>>> {
    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        "User logged out"
    );

    Ok(Json(ApiResponse::ok()))
}
