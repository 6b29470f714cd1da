pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::handlers as feature_handlers;
use crate::files::handlers as file_handlers;
use crate::history::handlers as history_handlers;
use crate::state::AppState;

/// Poster payloads and PDF uploads exceed axum's 2 MB default.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume builder
        .route(
            "/api/v1/resume/generate",
            post(feature_handlers::handle_resume_generate),
        )
        .route(
            "/api/v1/resume/import",
            post(file_handlers::handle_resume_import),
        )
        .route(
            "/api/v1/resume/current",
            get(feature_handlers::handle_resume_current),
        )
        .route(
            "/api/v1/resume/export",
            get(file_handlers::handle_resume_export),
        )
        // Poster studio
        .route(
            "/api/v1/poster/generate",
            post(feature_handlers::handle_poster_generate),
        )
        .route(
            "/api/v1/poster/current",
            get(feature_handlers::handle_poster_current),
        )
        // Smart forms
        .route("/api/v1/form/fill", post(feature_handlers::handle_form_fill))
        .route(
            "/api/v1/form/current",
            get(feature_handlers::handle_form_current),
        )
        .route("/api/v1/form/export", get(file_handlers::handle_form_export))
        // File boundary
        .route(
            "/api/v1/files/extract-text",
            post(file_handlers::handle_extract_text),
        )
        // History
        .route(
            "/api/v1/history",
            get(history_handlers::handle_list_history)
                .delete(history_handlers::handle_clear_history),
        )
        .route(
            "/api/v1/history/:id/image",
            get(history_handlers::handle_history_image),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
