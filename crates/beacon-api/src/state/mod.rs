//! Application state
//!
//! Holds the shared state for the Axum application: the presence tracker and
//! the configuration.

use std::sync::Arc;

use beacon_common::AppConfig;
use beacon_tracker::PresenceTracker;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    tracker: PresenceTracker,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(tracker: PresenceTracker, config: AppConfig) -> Self {
        Self {
            tracker,
            config: Arc::new(config),
        }
    }

    /// Get the presence tracker
    pub fn tracker(&self) -> &PresenceTracker {
        &self.tracker
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tracker", &self.tracker)
            .field("config", &"AppConfig")
            .finish()
    }
}
