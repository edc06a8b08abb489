//! souq server entry point.
//!
//! Boots the HTTP API over the catalog database and image store.

use anyhow::{Context, Result};
use souq_core::{AppConfig, CatalogDb, ImageStore};
use souq_server::{AppState, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(db_path = %config.db_path.display(), image_dir = %config.image_dir.display(), "starting souq");

    let catalog = CatalogDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open catalog database at {}", config.db_path.display()))?;
    let images = ImageStore::new(&config.image_dir)?;
    images.ensure_default().await?;

    let app = router(AppState { catalog, images }, &config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}
