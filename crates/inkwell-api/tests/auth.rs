mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;

use common::{PASSWORD, TestApp, error_code};

#[tokio::test]
async fn register_returns_user_without_password() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "alice", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["user"].get("password").is_none());
    assert!(!body.to_string().contains(PASSWORD));
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_fields() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");
    assert!(body["error"]["fields"]["username"].is_array());

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "bo", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["username"].is_array());
    assert!(body["error"]["fields"]["password"].is_array());
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let app = TestApp::new();
    let (user_id, _) = app.register("alice").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user_id"], user_id.as_str());

    // The issued token works on protected routes.
    let token = body["token"].as_str().unwrap();
    let (status, _) = app.get("/diaries", token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();
    app.register("alice").await;

    let (wrong_status, wrong_body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "not-the-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "not-the-password" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&wrong_body), "invalid_credentials");
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body, wrong_body);
    assert!(!wrong_body.to_string().contains(PASSWORD));
}

#[tokio::test]
async fn malformed_login_is_a_validation_error() {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, "/auth/login", None, Some(json!({ "username": "alice" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "validation_error");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["fields"]["body"].is_array());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "not_authenticated");

    let (status, _) = app.get("/posts", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/posts")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cGFzcw==")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
