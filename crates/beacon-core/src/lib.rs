//! # beacon-core
//!
//! Domain layer for the presence tracker: entity keys, active records,
//! normalized status events, and the port through which status changes are
//! mirrored to external storage.
//! This crate has zero dependencies on infrastructure (HTTP, Firebase, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ActiveRecord, Coordinates, DeviceStatus, StatusEvent, StatusReport};
pub use error::DomainError;
pub use traits::{MirrorResult, StatusMirror, StatusPayload};
pub use value_objects::{EntityKey, MirrorPath, OwnerScope};
