//! # beacon-store
//!
//! Implementations of the [`StatusMirror`](beacon_core::StatusMirror) port.
//!
//! ## Features
//!
//! - **Firebase**: writes status nodes through the Realtime Database REST API,
//!   authenticating with a service account (OAuth2 JWT-bearer grant)
//! - **Memory**: keeps every write in process, for tests and local runs
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::FirebaseMirror;
//!
//! let mirror = FirebaseMirror::new(&config.firebase)?;
//! mirror.set(&path, &StatusPayload::stop()).await?;
//! ```

pub mod error;
pub mod firebase;
pub mod memory;

pub use error::{FirebaseError, FirebaseResult};
pub use firebase::{AccessToken, FirebaseMirror, TokenCache};
pub use memory::{MemoryMirror, MirrorWrite};
