//! # beacon-common
//!
//! Shared utilities including configuration, error handling, service-account
//! credentials, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{AssertionClaims, AssertionSigner, CredentialError, ServiceAccount, FIREBASE_SCOPES};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, Environment, FirebaseConfig, LogFormat,
    RateLimitConfig, ServerConfig, TrackerConfig,
};
pub use error::{AppError, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
