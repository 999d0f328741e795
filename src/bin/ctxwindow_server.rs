//! HTTP server for splitting, token counting and summarization.
//!
//! Configuration comes from the environment and an optional `.env` file;
//! see [`ServerConfig::from_env`]. Log verbosity follows `RUST_LOG`.

use ctxwindow::server::{load_dotenv, serve, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(?config, "starting ctxwindow-server");

    serve(config).await
}
