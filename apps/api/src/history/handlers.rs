//! Axum route handlers for the history log.

use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::generation::GenerationResult;
use crate::models::history::HistoryEntry;
use crate::state::AppState;

/// GET /api/v1/history
///
/// Returns all history entries, newest first.
pub async fn handle_list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list().await)
}

/// DELETE /api/v1/history
///
/// Clears the whole log, memory and disk. Irreversible.
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/history/:id/image
///
/// Serves a poster entry's image bytes with its stored MIME type.
pub async fn handle_history_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .history
        .find(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("History entry {id} not found")))?;

    let GenerationResult::Poster(poster) = entry.payload else {
        return Err(AppError::NotFound(format!(
            "History entry {id} has no image"
        )));
    };

    let bytes = BASE64
        .decode(poster.image_data.as_bytes())
        .map_err(|e| AppError::Internal(anyhow!("stored image data is not valid base64: {e}")))?;

    Ok(([(header::CONTENT_TYPE, poster.mime_type)], bytes))
}
