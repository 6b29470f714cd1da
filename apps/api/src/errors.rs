use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::history::StoreError;
use crate::llm_client::ClientError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A {0} request is already in flight")]
    Busy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Model reply contained no image data")]
    NoImageProduced,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::InvalidInput(msg) => AppError::InvalidInput(msg),
            ClientError::Http(e) => AppError::Transport(e.to_string()),
            ClientError::Api { status, message } => {
                AppError::Transport(format!("API error (status {status}): {message}"))
            }
            ClientError::Parse(e) => AppError::MalformedResponse(e.to_string()),
            ClientError::EmptyContent => {
                AppError::MalformedResponse("model reply contained no text content".to_string())
            }
            ClientError::NoImage => AppError::NoImageProduced,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
            AppError::Busy(feature) => (
                StatusCode::CONFLICT,
                "BUSY",
                format!("A {feature} request is already in flight"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed model response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The AI reply did not match the expected shape".to_string(),
                )
            }
            AppError::NoImageProduced => (
                StatusCode::BAD_GATEWAY,
                "NO_IMAGE_PRODUCED",
                "The AI reply contained no image data".to_string(),
            ),
            AppError::Transport(msg) => {
                tracing::error!("Transport failure: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSPORT_FAILURE",
                    "The AI service could not be reached".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_FAILURE",
                    "Failed to persist history".to_string(),
                )
            }
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
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
