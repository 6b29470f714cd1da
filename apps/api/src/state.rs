use std::sync::Arc;

use crate::features::controller::FeatureController;
use crate::history::HistoryStore;
use crate::llm_client::GenerationClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Production: `GeminiClient`; tests mock it.
    pub llm: Arc<dyn GenerationClient>,
    pub history: Arc<HistoryStore>,
    pub resume: Arc<FeatureController>,
    pub poster: Arc<FeatureController>,
    pub form: Arc<FeatureController>,
}
