//! Response DTOs for API endpoints

use beacon_core::StatusEvent;
use beacon_tracker::TrackerStats;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value of the `status` field on every successful response
pub const SUCCESS: &str = "success";

/// Echo of an accepted status update
///
/// Serialized as the envelope marker followed by the event fields, so the
/// `status` key appears twice: `{"status":"success",...,"status":"start"}`.
/// Parsers that keep the last duplicate see the event status.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationResponse {
    pub esp32_id: String,
    pub name: String,
    pub status: String,
    pub user_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<StatusEvent> for LocationResponse {
    fn from(event: StatusEvent) -> Self {
        Self {
            user_id: event.owner.owner_id().map(String::from),
            latitude: event.coordinates.map(|c| c.latitude),
            longitude: event.coordinates.map(|c| c.longitude),
            status: event.status.to_string(),
            esp32_id: event.device_id,
            name: event.name,
        }
    }
}

impl Serialize for LocationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("status", SUCCESS)?;
        map.serialize_entry("esp32_id", &self.esp32_id)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("status", &self.status)?;
        if let Some(user_id) = &self.user_id {
            map.serialize_entry("user_id", user_id)?;
        }
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            map.serialize_entry("latitude", &latitude)?;
            map.serialize_entry("longitude", &longitude)?;
        }
        map.end()
    }
}

/// Active queue of one owner scope
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueueResponse {
    pub status: &'static str,
    pub queue: Vec<String>,
}

impl QueueResponse {
    pub fn new(queue: Vec<String>) -> Self {
        Self {
            status: SUCCESS,
            queue,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub tracker: TrackerStats,
}

impl HealthResponse {
    pub fn healthy(tracker: TrackerStats) -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
            tracker,
        }
    }
}
