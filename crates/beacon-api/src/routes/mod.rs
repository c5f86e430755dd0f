//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, location, queue};
use crate::state::AppState;

/// Tracker routes (health is exported separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/location", post(location::report_location))
        .route("/queue", get(queue::get_queue).post(queue::post_queue))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
