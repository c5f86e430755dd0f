//! Domain entities

mod active_record;
mod device_status;
mod status_event;

pub use active_record::ActiveRecord;
pub use device_status::DeviceStatus;
pub use status_event::{Coordinates, StatusEvent, StatusReport};
