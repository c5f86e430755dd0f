//! Health check handler

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Liveness probe, with current tracker counts
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.tracker().stats()))
}
