//! Entity keys and owner scopes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition a tracked entity belongs to
///
/// Events without a `user_id` land in the shared global scope; events with one
/// get a partition of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "scope", content = "id")]
pub enum OwnerScope {
    #[default]
    Global,
    User(String),
}

impl OwnerScope {
    /// Build a scope from an optional owner id. Empty ids map to the global scope.
    #[must_use]
    pub fn from_optional(owner_id: Option<&str>) -> Self {
        match owner_id {
            Some(id) if !id.is_empty() => Self::User(id.to_string()),
            _ => Self::Global,
        }
    }

    /// The owner id, if this is a user scope
    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::User(id) => Some(id),
        }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

/// Identifies one trackable thing: an entity name within an owner scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    pub owner: OwnerScope,
    pub name: String,
}

impl EntityKey {
    #[must_use]
    pub fn new(owner: OwnerScope, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    /// Key in the global scope
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(OwnerScope::Global, name)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
