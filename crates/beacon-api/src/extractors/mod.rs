//! Axum extractors for request handling
//!
//! Custom extractors for validated JSON bodies and query strings.

mod validated;

pub use validated::{JsonBody, OptionalValidatedJson, ValidatedQuery};
