//! The Axum front end: catch-all handler, middleware, hot swap.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use action_router::HttpServer;
use common::*;

fn server(dir: &std::path::Path) -> HttpServer {
    let config = test_config(dir);
    let (services, _) = services(&config);
    HttpServer::new(config, services)
}

fn request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_routes_request_and_sets_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = server(dir.path()).app();

    let response = app.oneshot(request("/users/5/posts/9?sort=asc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_string(response).await, "user 5 post 9");
}

#[tokio::test]
async fn test_unmatched_path_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = server(dir.path()).app();

    let response = app.oneshot(request("/no/such/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_challenge_and_access() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.app().oneshot(request("/admin/routes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Admin\""
    );

    let authorized = Request::builder()
        .uri("/admin/routes")
        .header(AUTHORIZATION, basic_auth(ADMIN_USER, ADMIN_PASSWORD))
        .body(Body::empty())
        .unwrap();
    let response = server.app().oneshot(authorized).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let routes: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let entries = routes.as_array().unwrap();
    assert_eq!(entries[0]["pattern"], "/admin");
    assert!(entries.iter().any(|e| e["slug"] == "users-id-posts-postid"));
}

#[tokio::test]
async fn test_reload_swaps_router() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.routing.home_action = None;
    let (services, _) = services(&config);
    let server = HttpServer::new(config.clone(), services);
    assert!(!server.router().get_slugs().contains("n-a"));

    config.routing.debug = true;
    config.routing.home_action = Some("posts-latest".into());
    server.state().reload(config).await;

    let router = server.router();
    assert_eq!(router.get_route("n-a", false, None).unwrap(), "/");
    let response = server.app().oneshot(request("/")).await.unwrap();
    assert_eq!(body_string(response).await, "latest");
}
