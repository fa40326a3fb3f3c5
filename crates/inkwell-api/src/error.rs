use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use inkwell_types::api::{ErrorBody, ErrorDetail};

use crate::validation::FieldErrors;

/// Every failure an endpoint can surface. None of these are fatal to the
/// process; each becomes a structured JSON response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request")]
    Validation(FieldErrors),

    #[error("{0}")]
    Auth(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Auth(_) => "not_authenticated",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let detail = match self {
            Self::Validation(fields) => ErrorDetail {
                code,
                message: "Invalid request.".into(),
                fields: Some(fields.into_map()),
            },
            Self::Internal(e) => {
                error!("Internal error: {:#}", e);
                ErrorDetail {
                    code,
                    message: "Internal server error.".into(),
                    fields: None,
                }
            }
            other => ErrorDetail {
                code,
                message: other.to_string(),
                fields: None,
            },
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}
