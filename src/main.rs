//! Service entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults when absent or unreadable).
//! 3. Build the [`AppContext`]: dictionaries, rule engine, analyzers.
//!    Any failure here aborts startup.
//! 4. Bind the listener and serve until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use grammar_assist::config::AppConfig;
use grammar_assist::server::{router, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("grammar-assist {} starting up", env!("CARGO_PKG_VERSION"));

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e:#}); using defaults");
        AppConfig::default()
    });
    let bind_addr = config.server.bind_addr();
    let realtime_path = config.server.realtime_path.clone();

    // 3. Shared context
    let ctx = Arc::new(AppContext::initialize(config).await?);
    for warning in &ctx.warnings {
        log::warn!("startup: {warning}");
    }

    // 4. Serve
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    log::info!("listening on http://{bind_addr} (realtime at {realtime_path})");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Ctrl-C received, shutting down");
}
