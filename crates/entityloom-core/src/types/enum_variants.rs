use std::fmt;

use serde::{Deserialize, Serialize};

/// The ordered, non-empty list of allowed values for an `enum` field.
///
/// Non-emptiness is enforced by the schema loader (which knows the field
/// name and can report a useful error); this type is just the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumVariants(Vec<String>);

impl EnumVariants {
    pub fn new(variants: Vec<String>) -> Self {
        Self(variants)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for EnumVariants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_checks_membership() {
        let v = EnumVariants::new(vec!["Active".into(), "Inactive".into()]);
        assert!(v.contains("Active"));
        assert!(!v.contains("Archived"));
    }

    #[test]
    fn display() {
        let v = EnumVariants::new(vec!["A".into(), "B".into()]);
        assert_eq!(v.to_string(), "[A, B]");
    }

    #[test]
    fn serde_roundtrip() {
        let v = EnumVariants::new(vec!["Active".into(), "Pending".into()]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["Active","Pending"]"#);
        let back: EnumVariants = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn empty_is_allowed_at_this_layer() {
        assert!(EnumVariants::new(vec![]).is_empty());
    }
}
