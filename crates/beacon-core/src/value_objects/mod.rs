//! Value objects - immutable types that represent domain concepts

mod entity_key;
mod mirror_path;

pub use entity_key::{EntityKey, OwnerScope};
pub use mirror_path::MirrorPath;
