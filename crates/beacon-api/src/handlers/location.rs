//! Status update handler

use axum::{extract::State, Json};

use crate::dto::{LocationRequest, LocationResponse};
use crate::extractors::JsonBody;
use crate::response::ApiResult;
use crate::state::AppState;

/// Apply a device's start/stop report and echo it back
///
/// POST /location
pub async fn report_location(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LocationRequest>,
) -> ApiResult<Json<LocationResponse>> {
    let event = state.tracker().report_status(request.into()).await?;
    Ok(Json(LocationResponse::from(event)))
}
