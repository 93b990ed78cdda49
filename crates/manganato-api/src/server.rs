//! HTTP server initialization and runtime setup.

use anyhow::{Context, Result};
use std::net::SocketAddr;

use manganato_core::{MangaClient, MangaScraper};

use crate::config::Config;
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built, the listener
/// cannot bind, or the server fails at runtime.
pub async fn run(config: Config) -> Result<()> {
    let client = MangaClient::with_config(config.client_config())
        .context("Failed to build upstream HTTP client")?;
    let scraper = MangaScraper::with_site(client, config.site_config());

    let app = app_router(AppState::new(scraper));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
