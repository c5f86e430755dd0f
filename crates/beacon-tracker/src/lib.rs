//! # beacon-tracker
//!
//! Tracks which entities are active, per owner scope, and reverts them to
//! "stop" when no fresh "start" arrives within the configured timeout.
//!
//! Every status change is mirrored to external storage through a
//! [`StatusMirror`](beacon_core::StatusMirror).

mod error;
mod key_lock;
mod partition;
mod timer;
mod tracker;

pub use error::{TrackerError, TrackerResult};
pub use tracker::{PresenceTracker, TrackerStats};
