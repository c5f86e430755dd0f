//! Data transfer objects for API requests and responses

pub mod requests;
pub mod responses;

pub use requests::{LocationRequest, QueueQuery, QueueRequest};
pub use responses::{HealthResponse, LocationResponse, QueueResponse, SUCCESS};
