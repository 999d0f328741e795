//! HTTP API over the splitter, the token counter and the summarizer.
//!
//! | Route | Body | Reply |
//! |-------|------|-------|
//! | `GET /api/health` | | `{status}` |
//! | `POST /api/tokenize` | `{text, model?}` | `{count, compatible_models, estimated}` |
//! | `POST /api/split` | `{text, chunk_size, chunk_overlap, separators?, trim_whitespace?}` | `{chunks, count}` |
//! | `POST /api/process` | `{text, api_key?}` | `{summary, tokens_used}` |
//!
//! Errors are `{"detail": "..."}`. `/api/process` never fails: a missing
//! key yields a mock summary and provider errors are returned as text.

mod api;
mod config;
mod error;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use api::{
    HealthResponse, ProcessRequest, SplitRequest, SplitResponse, TokenizeRequest, TokenizeResponse,
};
pub use config::{load_dotenv, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/tokenize", post(api::tokenize))
        .route("/api/split", post(api::split))
        .route("/api/process", post(api::process))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `config.bind_addr()` and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set, /api/process returns mock summaries unless a key is sent");
    }

    let app = build_router(Arc::new(AppState::new(config)?));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
