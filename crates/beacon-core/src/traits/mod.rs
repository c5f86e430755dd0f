//! Ports the domain needs from infrastructure

mod mirror;

pub use mirror::{MirrorResult, StatusMirror, StatusPayload};
