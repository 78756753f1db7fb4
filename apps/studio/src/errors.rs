use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::rewrite::RewriteError;
use crate::sync::SyncError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Rewrite(e) => {
                let (status, code) = rewrite_status(e);
                if status.is_server_error() {
                    tracing::error!("Rewrite error: {e}");
                }
                (status, code, e.to_string())
            }
            AppError::Sync(SyncError::InvalidVisualConfig(e)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Sync(e) => {
                tracing::error!("Sync error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SYNC_UNAVAILABLE",
                    "The preview engine is not running".to_string(),
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

fn rewrite_status(e: &RewriteError) -> (StatusCode, &'static str) {
    match e {
        RewriteError::InvalidApiKey | RewriteError::JobDescriptionTooShort => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        RewriteError::Auth(_) => (StatusCode::UNAUTHORIZED, "AI_AUTH_ERROR"),
        RewriteError::Overloaded(_) => (StatusCode::SERVICE_UNAVAILABLE, "AI_OVERLOADED"),
        RewriteError::Connectivity(_) => (StatusCode::BAD_GATEWAY, "AI_UNREACHABLE"),
        RewriteError::NoCompatibleModel => (StatusCode::BAD_GATEWAY, "AI_NO_COMPATIBLE_MODEL"),
        RewriteError::Integrity(_) => (StatusCode::BAD_GATEWAY, "AI_INTEGRITY_ERROR"),
    }
}
