//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a router that is ready to
//! serve, split out so tests can build the same router.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use dropgo_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(&config, store));

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
