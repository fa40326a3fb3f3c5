use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use inkwell_types::models::Identity;

use crate::auth::{AppState, decode_token, run_blocking};
use crate::error::ApiError;

/// Extract and validate the bearer JWT, then attach the caller's [`Identity`]
/// to the request. Tokens of deleted accounts are refused.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth("Authentication credentials were not provided."))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Auth("Authorization header must use the Bearer scheme."))?;

    let Some(claims) = decode_token(&state.auth, token) else {
        warn!("Rejected invalid or expired token");
        return Err(ApiError::Auth("Invalid or expired token."));
    };

    let user_id = claims.sub.to_string();
    let exists = run_blocking(&state, move |s| Ok(s.db.get_user_by_id(&user_id)?.is_some())).await?;
    if !exists {
        warn!("Rejected token for missing user {}", claims.sub);
        return Err(ApiError::Auth("Invalid or expired token."));
    }

    req.extensions_mut().insert(Identity {
        user_id: claims.sub,
        username: claims.username,
    });
    Ok(next.run(req).await)
}
