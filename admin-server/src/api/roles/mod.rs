//! Role management API module
//!
//! Every route sits behind the reserved-role gate, matching the
//! management UI which only surfaces role administration to the
//! superuser.

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_role_or_permission;
use crate::core::ServerState;
use shared::models::RESERVED_ROLE_NAME;

/// Entries accepted by the role-management gate
const ROLE_ADMIN_GATE: &[&str] = &[RESERVED_ROLE_NAME];

/// Role router - requires authentication and the reserved role
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/roles/count", get(handler::count))
        .route("/api/roles", get(handler::list).post(handler::create))
        .route(
            "/api/roles/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/roles/{id}/sync-permissions",
            post(handler::sync_permissions),
        )
        .route("/api/permissions", get(handler::all_permissions))
        .route_layer(middleware::from_fn(require_role_or_permission(
            ROLE_ADMIN_GATE,
        )))
}
