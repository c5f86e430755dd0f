//! Status events
//!
//! A [`StatusReport`] is what a device sends, with every field optional. It is
//! normalized into a [`StatusEvent`] before the tracker touches any state, so
//! an event that fails validation never mutates anything.

use serde::{Deserialize, Serialize};

use crate::entities::DeviceStatus;
use crate::error::DomainError;
use crate::value_objects::{EntityKey, MirrorPath, OwnerScope};

/// GPS fix attached to a status event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw status report as received from a device
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusReport {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub esp32_id: Option<String>,
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StatusReport {
    /// Validate the report and turn it into an event.
    ///
    /// `name`, `esp32_id` and `status` must be present and non-empty, and so
    /// must `user_id` when `require_owner` is set. Missing fields are reported
    /// before any other problem. Coordinates must be in range and are kept
    /// only when both halves are present.
    pub fn normalize(self, require_owner: bool) -> Result<StatusEvent, DomainError> {
        let (Some(name), Some(device_id), Some(status)) = (
            non_empty(self.name),
            non_empty(self.esp32_id),
            non_empty(self.status),
        ) else {
            return Err(DomainError::MissingFields);
        };

        let owner_id = non_empty(self.user_id);
        if require_owner && owner_id.is_none() {
            return Err(DomainError::MissingFields);
        }

        let status: DeviceStatus = status.parse()?;
        let owner = OwnerScope::from_optional(owner_id.as_deref());
        let event = StatusEvent::new(owner, name, device_id, status)?;

        check_range("latitude", self.latitude, MAX_LATITUDE)?;
        check_range("longitude", self.longitude, MAX_LONGITUDE)?;
        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Ok(event.with_coordinates(coordinates))
    }
}

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn check_range(field: &'static str, value: Option<f64>, limit: f64) -> Result<(), DomainError> {
    match value {
        Some(value) if !(-limit..=limit).contains(&value) => Err(DomainError::CoordinateOutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        }),
        _ => Ok(()),
    }
}

/// A validated status change for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub owner: OwnerScope,
    pub name: String,
    pub device_id: String,
    pub status: DeviceStatus,
    pub coordinates: Option<Coordinates>,
    path: MirrorPath,
}

impl StatusEvent {
    /// Create an event, checking that its identifiers form a valid storage path
    pub fn new(
        owner: OwnerScope,
        name: impl Into<String>,
        device_id: impl Into<String>,
        status: DeviceStatus,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let device_id = device_id.into();
        let path = MirrorPath::for_device(&name, &device_id, &owner)?;

        Ok(Self {
            owner,
            name,
            device_id,
            status,
            coordinates: None,
            path,
        })
    }

    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Key of the entity this event is about
    #[must_use]
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.owner.clone(), self.name.clone())
    }

    /// Storage path the event is mirrored to
    #[must_use]
    pub fn path(&self) -> &MirrorPath {
        &self.path
    }
}
