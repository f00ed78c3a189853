//! Authorization gate state machine
//!
//! Exercises the two middleware variants in isolation: no user -> 401,
//! reserved role -> allow, any required permission/role -> allow,
//! otherwise -> 403 naming what was missing.

use admin_server::auth::{CurrentUser, require_any_permission, require_role_or_permission};
use axum::body::Body;
use axum::{Extension, Router, middleware, routing::get};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn user(roles: &[&str], permissions: &[&str], reserved: bool) -> CurrentUser {
    CurrentUser {
        id: 7,
        name: "Probe".into(),
        email: "probe@example.com".into(),
        roles: roles.iter().map(|s| s.to_string()).collect(),
        permissions: permissions.iter().map(|s| s.to_string()).collect(),
        reserved,
    }
}

fn permission_gated(current: Option<CurrentUser>) -> Router {
    let router = Router::new()
        .route("/api/probe", get(|| async { "ok" }))
        .route_layer(middleware::from_fn(require_any_permission(&[
            "view users",
            "edit users",
        ])));
    match current {
        Some(current) => router.layer(Extension(current)),
        None => router,
    }
}

fn role_or_permission_gated(current: Option<CurrentUser>) -> Router {
    let router = Router::new()
        .route("/api/probe", get(|| async { "ok" }))
        .route_layer(middleware::from_fn(require_role_or_permission(&[
            "manager",
            "view reports",
        ])));
    match current {
        Some(current) => router.layer(Extension(current)),
        None => router,
    }
}

async fn probe(router: Router) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/probe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

#[tokio::test]
async fn missing_user_is_unauthenticated() {
    let (status, _) = probe(permission_gated(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = probe(role_or_permission_gated(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reserved_role_always_passes() {
    let reserved = user(&["super-admin"], &[], true);

    let (status, _) = probe(permission_gated(Some(reserved.clone()))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = probe(role_or_permission_gated(Some(reserved))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn any_required_permission_passes() {
    // Holds the second of the two listed permissions
    let editor = user(&[], &["edit users"], false);
    let (status, _) = probe(permission_gated(Some(editor))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_permission_is_forbidden_and_named() {
    let bystander = user(&["user"], &["view content"], false);
    let (status, body) = probe(permission_gated(Some(bystander))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("view users"), "body: {body}");
}

#[tokio::test]
async fn role_or_permission_matches_either_side() {
    // Matches by role name only
    let by_role = user(&["manager"], &[], false);
    let (status, _) = probe(role_or_permission_gated(Some(by_role))).await;
    assert_eq!(status, StatusCode::OK);

    // Matches by permission name only
    let by_permission = user(&[], &["view reports"], false);
    let (status, _) = probe(role_or_permission_gated(Some(by_permission))).await;
    assert_eq!(status, StatusCode::OK);

    // Matches neither
    let neither = user(&["user"], &["view content"], false);
    let (status, body) = probe(role_or_permission_gated(Some(neither))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("manager"), "body: {body}");
}
