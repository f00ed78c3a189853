//! User management API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// User router - requires authentication
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/count", get(handler::count))
        .route("/api/users/all", get(handler::all))
        .route("/api/users", get(handler::list).post(handler::create))
        .route(
            "/api/users/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
