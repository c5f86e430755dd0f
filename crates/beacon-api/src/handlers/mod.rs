//! Route handlers

pub mod health;
pub mod location;
pub mod queue;
