//! Axum route handlers for the three generators.

use anyhow::anyhow;
use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::generation::{
    AspectRatio, FormFillResult, GenerationRequest, PosterResult, ResumeResult,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeGenerateRequest {
    pub profile_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterGenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFillRequest {
    pub form_text: String,
    pub user_data_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/generate
pub async fn handle_resume_generate(
    State(state): State<AppState>,
    Json(request): Json<ResumeGenerateRequest>,
) -> Result<Json<ResumeResult>, AppError> {
    let request = GenerationRequest::Resume {
        profile_text: request.profile_text,
    };
    let result = state
        .resume
        .submit(state.llm.as_ref(), &state.history, request)
        .await?;
    let resume = result
        .into_resume()
        .ok_or_else(|| AppError::Internal(anyhow!("resume submit produced a non-resume result")))?;
    Ok(Json(resume))
}

/// GET /api/v1/resume/current
pub async fn handle_resume_current(
    State(state): State<AppState>,
) -> Result<Json<ResumeResult>, AppError> {
    state
        .resume
        .current()
        .await
        .and_then(|r| r.into_resume())
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No resume generated yet".to_string()))
}

/// POST /api/v1/poster/generate
pub async fn handle_poster_generate(
    State(state): State<AppState>,
    Json(request): Json<PosterGenerateRequest>,
) -> Result<Json<PosterResult>, AppError> {
    let request = GenerationRequest::Poster {
        prompt: request.prompt,
        aspect_ratio: request.aspect_ratio,
    };
    let result = state
        .poster
        .submit(state.llm.as_ref(), &state.history, request)
        .await?;
    let poster = result
        .into_poster()
        .ok_or_else(|| AppError::Internal(anyhow!("poster submit produced a non-poster result")))?;
    Ok(Json(poster))
}

/// GET /api/v1/poster/current
pub async fn handle_poster_current(
    State(state): State<AppState>,
) -> Result<Json<PosterResult>, AppError> {
    state
        .poster
        .current()
        .await
        .and_then(|r| r.into_poster())
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No poster generated yet".to_string()))
}

/// POST /api/v1/form/fill
pub async fn handle_form_fill(
    State(state): State<AppState>,
    Json(request): Json<FormFillRequest>,
) -> Result<Json<FormFillResult>, AppError> {
    let request = GenerationRequest::FormFill {
        form_text: request.form_text,
        user_data_text: request.user_data_text,
    };
    let result = state
        .form
        .submit(state.llm.as_ref(), &state.history, request)
        .await?;
    let form = result
        .into_form_fill()
        .ok_or_else(|| AppError::Internal(anyhow!("form submit produced a non-form result")))?;
    Ok(Json(form))
}

/// GET /api/v1/form/current
pub async fn handle_form_current(
    State(state): State<AppState>,
) -> Result<Json<FormFillResult>, AppError> {
    state
        .form
        .current()
        .await
        .and_then(|r| r.into_form_fill())
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No form filled yet".to_string()))
}
