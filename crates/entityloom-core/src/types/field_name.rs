use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A validated, non-empty field name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(SchemaError::MissingAttribute {
                field: "<field>".into(),
                attribute: "name".into(),
            });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FieldName> for String {
    fn from(n: FieldName) -> String {
        n.0
    }
}

impl TryFrom<String> for FieldName {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["name", "first_name", "a", "field123", "volume"] {
            assert!(FieldName::new(name).is_ok(), "expected valid: {name}");
        }
    }

    #[test]
    fn rejects_blank() {
        for name in ["", "   "] {
            assert!(FieldName::new(name).is_err(), "expected invalid: {name}");
        }
    }

    #[test]
    fn display_roundtrip() {
        let name = FieldName::new("first_name").unwrap();
        assert_eq!(name.to_string(), "first_name");
        assert_eq!(name.as_str(), "first_name");
    }

    #[test]
    fn serde_roundtrip() {
        let name = FieldName::new("email").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"email\"");
        let back: FieldName = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }

    #[test]
    fn serde_rejects_blank() {
        assert!(serde_json::from_str::<FieldName>("\"\"").is_err());
    }
}
