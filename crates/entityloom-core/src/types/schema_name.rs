use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A validated, non-empty entity schema name.
///
/// Unlike a programming-language identifier, the source documents don't
/// constrain casing — a schema name is just whatever string follows
/// `entity_name:`/`profile_name:`, so the only structural invariant worth
/// enforcing here is that it isn't blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(SchemaError::MissingAttribute {
                field: "<schema>".into(),
                attribute: "name".into(),
            });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SchemaName> for String {
    fn from(n: SchemaName) -> String {
        n.0
    }
}

impl TryFrom<String> for SchemaName {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for SchemaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["Contact", "device", "SmartHome", "a"] {
            assert!(SchemaName::new(name).is_ok(), "expected valid: {name}");
        }
    }

    #[test]
    fn rejects_blank() {
        for name in ["", "   "] {
            assert!(SchemaName::new(name).is_err(), "expected invalid: {name}");
        }
    }

    #[test]
    fn display_roundtrip() {
        let name = SchemaName::new("Device").unwrap();
        assert_eq!(name.to_string(), "Device");
        assert_eq!(name.as_str(), "Device");
    }

    #[test]
    fn serde_roundtrip() {
        let name = SchemaName::new("Device").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Device\"");
        let back: SchemaName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }

    #[test]
    fn serde_rejects_blank() {
        assert!(serde_json::from_str::<SchemaName>("\"\"").is_err());
    }
}
