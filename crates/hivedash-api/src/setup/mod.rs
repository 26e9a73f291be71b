//! Application setup and initialization
//!
//! Startup is split into configuration checks, document store connection,
//! service wiring and routing so tests can build a router from doubles.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use hivedash_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let database = database::setup_database(&config).await?;

    let state = services::initialize_services(&config, database)?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
