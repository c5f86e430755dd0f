//! Active queue handlers

use axum::{extract::State, Json};

use crate::dto::{QueueQuery, QueueRequest, QueueResponse};
use crate::extractors::{OptionalValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// List the active entities of an owner scope
///
/// GET /queue
pub async fn get_queue(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<QueueQuery>,
) -> ApiResult<Json<QueueResponse>> {
    let queue = state.tracker().list_active(query.user_id.as_deref())?;
    Ok(Json(QueueResponse::new(queue)))
}

/// Same as `GET /queue`; the owner may also come in the JSON body, which
/// takes precedence over the query string.
///
/// POST /queue
pub async fn post_queue(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<QueueQuery>,
    OptionalValidatedJson(body): OptionalValidatedJson<QueueRequest>,
) -> ApiResult<Json<QueueResponse>> {
    let user_id = body.and_then(|b| b.user_id).or(query.user_id);
    let queue = state.tracker().list_active(user_id.as_deref())?;
    Ok(Json(QueueResponse::new(queue)))
}
