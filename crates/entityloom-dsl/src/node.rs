use indexmap::IndexMap;

/// A generic, syntax-agnostic document tree.
///
/// Every [`crate::DocumentDecoder`] implementation produces this shape
/// regardless of the concrete document syntax it understands. Scalars are
/// always strings: the decoder knows syntax, the field-value layer upstream
/// knows semantics and is responsible for parsing `"150"` into an integer or
/// `"true"` into a boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An ordered mapping from key to child node. Order is preserved because
    /// object-field iteration order is an observable guarantee of the system.
    Mapping(IndexMap<String, Node>),
    /// An ordered sequence of child nodes.
    Sequence(Vec<Node>),
    /// A single scalar, already stringified.
    Scalar(String),
    /// An explicit null/empty node.
    Null,
}

impl Node {
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Node::Scalar("1".into()));
        let mapping = Node::Mapping(map);
        assert!(mapping.as_mapping().is_some());
        assert!(mapping.as_sequence().is_none());
        assert!(mapping.as_scalar().is_none());

        let seq = Node::Sequence(vec![Node::Scalar("x".into())]);
        assert!(seq.as_sequence().is_some());

        let scalar = Node::Scalar("hi".into());
        assert_eq!(scalar.as_scalar(), Some("hi"));

        assert!(Node::Null.is_null());
        assert!(!mapping_ref(&seq).is_null());
    }

    fn mapping_ref(n: &Node) -> &Node {
        n
    }
}
