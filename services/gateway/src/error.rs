use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rate_engine::QuoteError;
use serde_json::json;
use thiserror::Error;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Validation(e) => AppError::BadRequest(e.to_string()),
            other => AppError::PersistenceFailed(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::PersistenceFailed(msg) => {
                // storage details stay in the logs
                tracing::error!(error = %msg, "quote persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to persist quote".to_string(),
                    "PERSISTENCE_FAILED",
                )
            }
            AppError::InternalError(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}
