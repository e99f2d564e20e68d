use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::photo::PhotoLoadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Photo could not be loaded: {0}")]
    PhotoLoad(#[from] PhotoLoadError),

    #[error("Editor session is not running")]
    EditorUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PhotoLoad(e) => {
                tracing::warn!("Photo rejected: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PHOTO_LOAD_ERROR",
                    "The selected file could not be read as an image".to_string(),
                )
            }
            AppError::EditorUnavailable => {
                tracing::error!("Editor actor is gone");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "EDITOR_UNAVAILABLE",
                    "The editing session is not available".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
