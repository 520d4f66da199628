// =============================================================================
// TickerDeck — Main Entry Point
// =============================================================================
//
// A single-session stock-analysis dashboard backend: fetches daily history
// for a selected ticker, computes RSI / SMA / EMA / MACD, and serves a chart
// spec plus summary metrics over REST.  Request/response only — no background
// workers.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod chart;
mod indicators;
mod market_data;
mod runtime_config;
mod session;
mod summary;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

/// Default location of the persisted runtime configuration.
const CONFIG_PATH: &str = "runtime_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Env overrides for deployment without touching the config file.
    if let Ok(addr) = std::env::var("TICKERDECK_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(url) = std::env::var("TICKERDECK_PROVIDER_URL") {
        config.provider_base_url = url;
    }

    info!(
        provider = %config.provider_base_url,
        lookback_years = config.lookback_years,
        cache_capacity = config.cache_capacity,
        "TickerDeck starting"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // ── 3. Start the API server ──────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping");
    server.abort();

    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("TickerDeck shut down complete.");
    Ok(())
}
