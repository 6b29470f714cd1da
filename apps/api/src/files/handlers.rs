//! Axum route handlers for the file boundary: resume JSON round-trip, form
//! text export, and PDF text extraction.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::files::{extract_pdf_text, filename_stem};
use crate::models::generation::{GenerationResult, ResumeResult};
use crate::models::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// POST /api/v1/resume/import
///
/// Imports a previously exported resume JSON document. Typed deserialization
/// enforces the structural check (a full name and an experience array must be
/// present). The import becomes the current resume and is recorded in history.
pub async fn handle_resume_import(
    State(state): State<AppState>,
    Json(resume): Json<ResumeResult>,
) -> Result<Json<ResumeResult>, AppError> {
    state
        .resume
        .set_current(GenerationResult::Resume(resume.clone()))
        .await;
    state
        .history
        .append(HistoryEntry::for_imported_resume(&resume))
        .await?;
    Ok(Json(resume))
}

/// GET /api/v1/resume/export
///
/// Downloads the current resume as pretty-printed JSON.
pub async fn handle_resume_export(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resume = state
        .resume
        .current()
        .await
        .and_then(|r| r.into_resume())
        .ok_or_else(|| AppError::NotFound("No resume to export".to_string()))?;

    let body = serde_json::to_string_pretty(&resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize resume: {e}")))?;
    let filename = format!("{}_Resume.json", filename_stem(&resume.full_name));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// GET /api/v1/form/export
///
/// Downloads the current filled-form text as plain text.
pub async fn handle_form_export(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let form = state
        .form
        .current()
        .await
        .and_then(|r| r.into_form_fill())
        .ok_or_else(|| AppError::NotFound("No filled form to export".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"filled_form.txt\"".to_string(),
            ),
        ],
        form.filled_text,
    ))
}

/// POST /api/v1/files/extract-text
///
/// Accepts a multipart upload with a `file` field holding a PDF and returns
/// its text layer, for pre-populating input fields.
pub async fn handle_extract_text(
    mut multipart: Multipart,
) -> Result<Json<ExtractTextResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data: Bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("failed to read upload: {e}")))?;
            let text = extract_pdf_text(&data)?;
            return Ok(Json(ExtractTextResponse { text }));
        }
    }

    Err(AppError::InvalidInput(
        "missing 'file' field in multipart body".to_string(),
    ))
}
