use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use inkwell_db::{CommentRow, Database, is_constraint_violation};
use inkwell_types::api::CommentRequest;
use inkwell_types::models::{Comment, Identity};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::rows::{comment_from_row, now_timestamp};
use crate::validation::{invalid_post, validate_comment};

pub fn create(db: &Database, identity: &Identity, req: CommentRequest) -> Result<Comment, ApiError> {
    let post_id = validate_comment(&req)?.to_string();
    if !db.post_exists(&post_id)? {
        return Err(ApiError::validation("post", invalid_post(&req.post)));
    }

    let row = CommentRow {
        id: Uuid::new_v4().to_string(),
        post_id,
        owner_id: identity.user_id.to_string(),
        content: req.content,
        created_at: now_timestamp(),
    };
    store(db, &row, &req.post)?;

    Ok(comment_from_row(row)?)
}

/// The post may be deleted between the existence check and the insert; the
/// foreign key then rejects the row and it is reported like a missing post.
fn store(db: &Database, row: &CommentRow, raw_post: &str) -> Result<(), ApiError> {
    db.insert_comment(row).map_err(|e| {
        if is_constraint_violation(&e) {
            ApiError::validation("post", invalid_post(raw_post))
        } else {
            ApiError::Internal(e)
        }
    })
}

/// Comments of `post_id`, for any caller. An unknown post has no comments.
pub fn list(db: &Database, post_id: Uuid) -> Result<Vec<Comment>, ApiError> {
    let comments = db
        .list_comments_for_post(&post_id.to_string())?
        .into_iter()
        .map(comment_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(comments)
}

/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let comment = run_blocking(&state, move |s| create(&s.db, &identity, req)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(_identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let Ok(post_id) = post_id.parse::<Uuid>() else {
        return Ok(Json(Vec::<Comment>::new()));
    };
    let comments = run_blocking(&state, move |s| list(&s.db, post_id)).await?;
    Ok(Json(comments))
}
