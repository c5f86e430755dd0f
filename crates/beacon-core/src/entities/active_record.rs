//! Active record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory marker that an entity is currently started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRecord {
    pub name: String,
    /// Device that activated the entity
    pub device_id: String,
    pub activated_at: DateTime<Utc>,
    /// Generation of the most recent start for this entity. Bumped on every
    /// start so a timer armed by an older start can tell it has been superseded.
    pub generation: u64,
}

impl ActiveRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, device_id: impl Into<String>, generation: u64) -> Self {
        Self {
            name: name.into(),
            device_id: device_id.into(),
            activated_at: Utc::now(),
            generation,
        }
    }

    /// Record a fresh start for an already active entity
    pub fn refresh(&mut self, generation: u64) {
        self.generation = generation;
    }
}
