//! Contact form API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Contact router - requires authentication
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/contact", post(handler::submit))
}
