#![allow(dead_code)]

use std::sync::Arc;

use argon2::Params;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use inkwell_api::{AppStateInner, AuthSettings, router};
use inkwell_db::Database;

pub const PASSWORD: &str = "correct-horse-battery";

/// In-process server over a fresh in-memory database.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("in-memory database");
        // Cheap hashing parameters keep the suite fast.
        let auth = AuthSettings::new("integration-test-secret")
            .with_password_params(Params::new(8, 1, 1, None).expect("argon2 params"));
        let state = Arc::new(AppStateInner { db, auth });

        Self {
            router: router(state),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("request")).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = resp.status();
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers `username` and returns `(user_id, token)`.
    pub async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");

        let id = body["user"]["id"].as_str().expect("user id").to_string();
        let token = body["token"].as_str().expect("token").to_string();
        (id, token)
    }

    pub async fn create_post(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .post("/posts", token, json!({ "title": title, "content": format!("{title} body") }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create post: {body}");
        body
    }

    pub async fn create_diary(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .post("/diaries", token, json!({ "title": title, "content": format!("{title} body") }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create diary: {body}");
        body
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
