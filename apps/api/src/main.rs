mod config;
mod errors;
mod features;
mod files;
mod history;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::features::controller::FeatureController;
use crate::history::HistoryStore;
use crate::llm_client::GeminiClient;
use crate::models::generation::GenerationKind;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OmniCreate API v{}", env!("CARGO_PKG_VERSION"));

    // Load the persisted history log (missing or corrupt files degrade to empty)
    let history = Arc::new(HistoryStore::load(&config.history_path));
    info!("History store ready at {}", config.history_path.display());

    // Initialize the LLM client
    let llm = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!(
        "LLM client initialized (text model: {}, image model: {})",
        llm_client::TEXT_MODEL,
        llm_client::IMAGE_MODEL
    );

    // One controller per generator, each with its own in-flight guard
    let state = AppState {
        llm,
        history,
        resume: Arc::new(FeatureController::new(GenerationKind::Resume)),
        poster: Arc::new(FeatureController::new(GenerationKind::Poster)),
        form: Arc::new(FeatureController::new(GenerationKind::Form)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
