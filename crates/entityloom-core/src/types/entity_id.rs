use std::fmt;

use serde::{Deserialize, Serialize};

/// An entity identifier.
///
/// Unlike the schema-authoring types, entity ids are supplied by the
/// requester (`createEntity`'s `id` argument, or a data bundle's top-level
/// key) rather than generated here — the registry's job is to reject
/// duplicates, not to mint identity. Any non-empty string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.0
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        let id = EntityId::new("device1");
        assert_eq!(id.to_string(), "device1");
        assert_eq!(id.as_str(), "device1");
    }

    #[test]
    fn serde_roundtrip() {
        let id = EntityId::new("home1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"home1\"");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn equality_by_value() {
        assert_eq!(EntityId::new("a"), EntityId::from("a".to_string()));
    }
}
