//! Firebase Realtime Database mirror

mod client;
mod token;

pub use client::FirebaseMirror;
pub use token::{AccessToken, TokenCache};
