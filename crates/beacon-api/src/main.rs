//! Beacon API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p beacon-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use anyhow::Context;
use beacon_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing(&TracingConfig::for_settings(&config.app)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        timeout_secs = config.tracker.timeout_secs,
        require_owner = config.tracker.require_owner,
        "Configuration loaded"
    );

    beacon_api::run(config).await.map_err(|e| {
        error!(error = %e, "Server failed");
        e
    })?;

    Ok(())
}
