//! Authentication and authorization middleware
//!
//! Per-request gate order:
//! 1. no valid token -> 401 "not logged in"
//! 2. reserved role -> allow
//! 3. any required permission (or role, for the role-or-permission gate)
//!    -> allow
//! 4. otherwise -> 403 naming what was missing

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::security_log;
use crate::utils::AppError;

/// Paths served without authentication
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/health"];

/// Authentication middleware - requires a logged-in user
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then loads the user's roles and effective permission set from the
/// store and injects [`CurrentUser`] into the request extensions.
///
/// # Skipped paths
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths
/// - [`PUBLIC_API_ROUTES`]
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes pass through (and 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            return match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Invalid subject claim"))?;

    // Request-scoped store lookup: grant changes apply on the next request
    let user = user_repo::find_by_id(&state.pool, user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::invalid_token("Unknown user"))?;

    let permissions = state.permissions();
    let current_user = CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        roles: permissions.role_names_of(user_id).await?,
        permissions: permissions.effective_permissions(user_id).await?,
        reserved: permissions.has_reserved_role(user_id).await?,
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Permission gate - requires any of the listed permissions
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/users", get(handler::list))
///     .route_layer(middleware::from_fn(require_any_permission(&["view users"])));
/// ```
///
/// # Errors
///
/// 401 without an authenticated user, 403 when no listed permission is
/// held.
pub fn require_any_permission(
    permissions: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_any_permission(permissions) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    email = user.email.clone(),
                    required_permissions = permissions.join("|")
                );
                return Err(AppError::forbidden(format!(
                    "Missing permission: {}",
                    permissions.join(" | ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Role-or-permission gate - requires any entry to match a held role OR a
/// held permission
///
/// # Errors
///
/// 401 without an authenticated user, 403 when nothing matches.
pub fn require_role_or_permission(
    items: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_any_role_or_permission(items) {
                security_log!(
                    "WARN",
                    "role_or_permission_denied",
                    user_id = user.id,
                    email = user.email.clone(),
                    required = items.join("|")
                );
                return Err(AppError::forbidden(format!(
                    "Missing role or permission: {}",
                    items.join(" | ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
