//! Server setup and initialization
//!
//! Provides the application builder and the server runner.

use std::sync::Arc;

use axum::Router;
use beacon_common::{AppConfig, AppError};
use beacon_store::FirebaseMirror;
use beacon_tracker::PresenceTracker;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let router = apply_rate_limit(create_router(), &config.rate_limit).merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    router.with_state(state)
}

/// Connect the Firebase mirror and create AppState
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let mirror = FirebaseMirror::new(&config.firebase)
        .map_err(|e| AppError::config(format!("Failed to set up Firebase client: {e}")))?;
    info!(database_url = %config.firebase.database_url, "Firebase mirror ready");

    let tracker = PresenceTracker::new(Arc::new(mirror), &config.tracker);
    info!(
        timeout_secs = config.tracker.timeout_secs,
        require_owner = config.tracker.require_owner,
        "Presence tracker ready"
    );

    Ok(AppState::new(tracker, config))
}

/// Run the HTTP server until Ctrl-C or SIGTERM, then cancel pending expiries
pub async fn run_server(app: Router, addr: &str, tracker: PresenceTracker) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tracker))
        .await
        .map_err(AppError::internal)?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config)?;
    let tracker = state.tracker().clone();
    let app = create_app(state);

    run_server(app, &addr, tracker).await
}

async fn shutdown_signal(tracker: PresenceTracker) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
    tracker.shutdown();
}
