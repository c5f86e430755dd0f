//! Storage paths in the mirrored realtime database

use std::fmt;

use crate::error::DomainError;
use crate::value_objects::OwnerScope;

/// Root node all device statuses are written under
const LOCATIONS_ROOT: &str = "locations";

/// Characters the realtime database refuses inside a key
const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

/// Longest key the realtime database accepts, in UTF-8 bytes
const MAX_KEY_BYTES: usize = 768;

/// Check that a value can be used as one segment of a storage path
fn validate_key_segment(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.len() > MAX_KEY_BYTES {
        return Err(DomainError::KeyTooLong {
            field,
            len: value.len(),
            max: MAX_KEY_BYTES,
        });
    }
    if value.chars().any(|c| FORBIDDEN_KEY_CHARS.contains(&c) || c.is_control()) {
        return Err(DomainError::InvalidKey {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Path of a device status node: `locations/{name}/{device_id}[/{user_id}]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MirrorPath(String);

impl MirrorPath {
    /// Build the status path for a device
    pub fn for_device(
        name: &str,
        device_id: &str,
        owner: &OwnerScope,
    ) -> Result<Self, DomainError> {
        validate_key_segment("name", name)?;
        validate_key_segment("esp32_id", device_id)?;

        let mut path = format!("{LOCATIONS_ROOT}/{name}/{device_id}");
        if let Some(owner_id) = owner.owner_id() {
            validate_key_segment("user_id", owner_id)?;
            path.push('/');
            path.push_str(owner_id);
        }
        Ok(Self(path))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MirrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MirrorPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
