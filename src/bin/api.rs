//! EcoRoute API Server
//!
//! Run with: cargo run --bin ecoroute-api
//!
//! # Configuration
//!
//! Reads the `[api]` and `[logging]` sections of the EcoRoute config file
//! (see `ecoroute config`). Environment variables override the file:
//! - `ECOROUTE_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `ECOROUTE_API_PORT`: Port to listen on (default: 5000)
//! - `ECOROUTE_DB_PATH`: SQLite database file
//! - `ECOROUTE_LOG_LEVEL`, `ECOROUTE_LOG_FORMAT`
//! - `RUST_LOG`: Full filter directive, wins over the log level
//!
//! An optional first argument names a config file to load instead of the
//! standard locations.

use ecoroute::api::{serve, AppState};
use ecoroute::config::Config;
use ecoroute::store::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load_logged(config_path.as_deref())?;

    config.logging.init();

    tracing::info!("Starting EcoRoute API server v{}", env!("CARGO_PKG_VERSION"));

    let api_config = config.api;

    tracing::info!("Database: {:?}", api_config.database);
    let store = Arc::new(SqliteStore::open(&api_config.database)?);
    tracing::info!("Store ready ({} keys)", store.count()?);

    if api_config.cors_origins.is_empty() {
        tracing::info!("CORS enabled for all origins");
    } else {
        tracing::info!("CORS origins: {:?}", api_config.cors_origins);
    }

    let state = AppState::new(store, api_config.clone());

    tracing::info!("Test endpoint: http://{}/api/test", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("EcoRoute API server stopped");
    Ok(())
}
