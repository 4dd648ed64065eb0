//! API error type and its JSON response mapping.
//!
//! Every handler returns `Result<_, ApiError>`. Bodies always have the shape
//! `{"error": <kind>, "message": <text>}`; internal failures are logged and
//! replaced by a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::services::folder::FolderError;
use crate::services::play::PlayError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body; internal details never leave the server.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(message) => ErrorBody { error: "validation", message: message.clone() },
            Self::NotFound(message) => ErrorBody { error: "not_found", message: message.clone() },
            Self::Internal(_) => ErrorBody { error: "internal", message: "Internal server error".into() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<FolderError> for ApiError {
    fn from(err: FolderError) -> Self {
        match err {
            FolderError::NotFound(_) => Self::NotFound(err.to_string()),
            FolderError::Invalid(message) => Self::Validation(message),
            FolderError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<PlayError> for ApiError {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::NotFound(_) | PlayError::FolderNotFound(_) => Self::NotFound(err.to_string()),
            PlayError::Invalid(message) => Self::Validation(message),
            PlayError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
