use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{comments, diaries, posts};

/// Full HTTP surface. Everything except health and the auth endpoints
/// requires a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/diaries", get(diaries::list_diaries).post(diaries::create_diary))
        .route(
            "/diaries/{id}",
            get(diaries::get_diary)
                .put(diaries::replace_diary)
                .patch(diaries::patch_diary)
                .delete(diaries::delete_diary),
        )
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::replace_post)
                .patch(posts::patch_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/comments", get(comments::list_comments))
        .route("/comments", post(comments::create_comment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
