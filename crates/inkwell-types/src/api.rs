use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

// -- JWT Claims --

/// JWT claims issued on register/login and checked by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Diaries / Posts --

/// Body for creating or replacing a diary or post.
///
/// Unknown fields are ignored, so a client-supplied `owner` has no effect.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    pub title: String,
    pub content: String,
}

/// Body for a partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<EntryRequest> for EntryPatch {
    fn from(req: EntryRequest) -> Self {
        Self {
            title: Some(req.title),
            content: Some(req.content),
        }
    }
}

// -- Comments --

/// `post` stays a string on the wire so a malformed id is reported as a
/// field error on `post`, the same as an id that names no post.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub post: String,
    pub content: String,
}

// -- Errors --

/// Wire shape of every error response: `{ "error": { ... } }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}
