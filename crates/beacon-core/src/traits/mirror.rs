//! Status mirror port
//!
//! The realtime database is a downstream copy of the tracker's decisions, not a
//! source of truth. The tracker only ever writes to it, one node per device.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{DeviceStatus, StatusEvent};
use crate::error::DomainError;
use crate::value_objects::MirrorPath;

/// Result type for mirror operations
pub type MirrorResult<T> = Result<T, DomainError>;

/// Value written at a device's status node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: DeviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl StatusPayload {
    /// Payload written when an entity expires
    #[must_use]
    pub fn stop() -> Self {
        Self {
            status: DeviceStatus::Stop,
            latitude: None,
            longitude: None,
        }
    }

    /// Payload mirroring a reported event
    #[must_use]
    pub fn from_event(event: &StatusEvent) -> Self {
        Self {
            status: event.status,
            latitude: event.coordinates.map(|c| c.latitude),
            longitude: event.coordinates.map(|c| c.longitude),
        }
    }
}

/// Write access to the external key-value store
#[async_trait]
pub trait StatusMirror: Send + Sync {
    /// Overwrite the node at `path` with `payload`
    async fn set(&self, path: &MirrorPath, payload: &StatusPayload) -> MirrorResult<()>;
}
