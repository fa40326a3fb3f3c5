use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use inkwell_db::Database;
use inkwell_types::api::{EntryPatch, EntryRequest};
use inkwell_types::models::{Identity, Post};

use crate::auth::{AppState, run_blocking};
use crate::entries::{self, parse_path_id};
use crate::error::ApiError;

// Posts are public to read; only the owner may change or remove one.

pub fn create(db: &Database, identity: &Identity, req: EntryRequest) -> Result<Post, ApiError> {
    entries::create(db, identity, req)
}

pub fn list(db: &Database, identity: &Identity) -> Result<Vec<Post>, ApiError> {
    entries::list(db, identity)
}

pub fn get(db: &Database, identity: &Identity, id: Uuid) -> Result<Post, ApiError> {
    entries::get(db, identity, id)
}

pub fn update(db: &Database, identity: &Identity, id: Uuid, patch: EntryPatch) -> Result<Post, ApiError> {
    entries::update(db, identity, id, patch)
}

pub fn delete(db: &Database, identity: &Identity, id: Uuid) -> Result<(), ApiError> {
    entries::delete::<Post>(db, identity, id)
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let post = run_blocking(&state, move |s| create(&s.db, &identity, req)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = run_blocking(&state, move |s| list(&s.db, &identity)).await?;
    Ok(Json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Post>(&id)?;
    let post = run_blocking(&state, move |s| get(&s.db, &identity, id)).await?;
    Ok(Json(post))
}

/// PUT /posts/{id}
pub async fn replace_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Post>(&id)?;
    let Json(req) = body?;
    let post = run_blocking(&state, move |s| update(&s.db, &identity, id, req.into())).await?;
    Ok(Json(post))
}

/// PATCH /posts/{id}
pub async fn patch_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Post>(&id)?;
    let Json(patch) = body?;
    let post = run_blocking(&state, move |s| update(&s.db, &identity, id, patch)).await?;
    Ok(Json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Post>(&id)?;
    run_blocking(&state, move |s| delete(&s.db, &identity, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
