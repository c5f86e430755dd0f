//! Request DTOs for API endpoints
//!
//! Devices are not consistent about whether ids are sent as JSON strings or
//! numbers, so identifier fields accept both.

use beacon_core::StatusReport;
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Status update posted by a device
///
/// Every field is optional at this level. The tracker checks the report as a
/// whole, so a missing field is always reported before a malformed one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub esp32_id: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "text_or_number")]
    pub user_id: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,
}

impl From<LocationRequest> for StatusReport {
    fn from(request: LocationRequest) -> Self {
        Self {
            user_id: request.user_id,
            name: request.name,
            esp32_id: request.esp32_id,
            status: request.status,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

/// Optional JSON body of `POST /queue`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QueueRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    #[validate(length(max = 768, message = "user_id is too long"))]
    pub user_id: Option<String>,
}

/// Query string of `GET /queue` and `POST /queue`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QueueQuery {
    #[validate(length(max = 768, message = "user_id is too long"))]
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}
