use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use inkwell_db::Database;
use inkwell_types::api::{EntryPatch, EntryRequest};
use inkwell_types::models::{Diary, Identity};

use crate::auth::{AppState, run_blocking};
use crate::entries::{self, parse_path_id};
use crate::error::ApiError;

// Diaries are private: every operation is scoped to the caller.

pub fn create(db: &Database, identity: &Identity, req: EntryRequest) -> Result<Diary, ApiError> {
    entries::create(db, identity, req)
}

pub fn list(db: &Database, identity: &Identity) -> Result<Vec<Diary>, ApiError> {
    entries::list(db, identity)
}

pub fn get(db: &Database, identity: &Identity, id: Uuid) -> Result<Diary, ApiError> {
    entries::get(db, identity, id)
}

pub fn update(db: &Database, identity: &Identity, id: Uuid, patch: EntryPatch) -> Result<Diary, ApiError> {
    entries::update(db, identity, id, patch)
}

pub fn delete(db: &Database, identity: &Identity, id: Uuid) -> Result<(), ApiError> {
    entries::delete::<Diary>(db, identity, id)
}

/// POST /diaries
pub async fn create_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let diary = run_blocking(&state, move |s| create(&s.db, &identity, req)).await?;
    Ok((StatusCode::CREATED, Json(diary)))
}

/// GET /diaries
pub async fn list_diaries(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let diaries = run_blocking(&state, move |s| list(&s.db, &identity)).await?;
    Ok(Json(diaries))
}

/// GET /diaries/{id}
pub async fn get_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Diary>(&id)?;
    let diary = run_blocking(&state, move |s| get(&s.db, &identity, id)).await?;
    Ok(Json(diary))
}

/// PUT /diaries/{id}
pub async fn replace_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Diary>(&id)?;
    let Json(req) = body?;
    let diary = run_blocking(&state, move |s| update(&s.db, &identity, id, req.into())).await?;
    Ok(Json(diary))
}

/// PATCH /diaries/{id}
pub async fn patch_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Diary>(&id)?;
    let Json(patch) = body?;
    let diary = run_blocking(&state, move |s| update(&s.db, &identity, id, patch)).await?;
    Ok(Json(diary))
}

/// DELETE /diaries/{id}
pub async fn delete_diary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_path_id::<Diary>(&id)?;
    run_blocking(&state, move |s| delete(&s.db, &identity, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
