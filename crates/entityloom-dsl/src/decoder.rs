use indexmap::IndexMap;

use crate::error::DslError;
use crate::node::Node;

/// A pluggable parser from a named document's text into a [`Node`] tree.
///
/// The core schema/data loaders are agnostic to document syntax; they only
/// ever see `Node`. This is the seam where a different document format could
/// be swapped in without touching anything above it.
pub trait DocumentDecoder {
    fn decode(&self, name: &str, content: &str) -> Result<Node, DslError>;
}

/// Decodes YAML documents, the syntax this system's document bundles use.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlDecoder;

impl DocumentDecoder for YamlDecoder {
    fn decode(&self, name: &str, content: &str) -> Result<Node, DslError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| DslError::BadSyntax {
                file: name.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(file = name, "decoded document");
        Ok(yaml_to_node(&value))
    }
}

fn yaml_to_node(value: &serde_yaml::Value) -> Node {
    match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Scalar(b.to_string()),
        serde_yaml::Value::Number(n) => Node::Scalar(n.to_string()),
        serde_yaml::Value::String(s) => Node::Scalar(s.clone()),
        serde_yaml::Value::Sequence(seq) => Node::Sequence(seq.iter().map(yaml_to_node).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
                };
                out.insert(key, yaml_to_node(v));
            }
            Node::Mapping(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scalar_types_as_strings() {
        let decoder = YamlDecoder;
        let node = decoder
            .decode(
                "home.yaml",
                "entity_name: Device\nfields:\n  active:\n    type: boolean\n    required: true\n",
            )
            .unwrap();
        let map = node.as_mapping().unwrap();
        assert_eq!(map["entity_name"].as_scalar(), Some("Device"));
        let fields = map["fields"].as_mapping().unwrap();
        let active = fields["active"].as_mapping().unwrap();
        assert_eq!(active["required"].as_scalar(), Some("true"));
    }

    #[test]
    fn decodes_sequences() {
        let decoder = YamlDecoder;
        let node = decoder.decode("x.yaml", "values:\n  - Active\n  - Inactive\n").unwrap();
        let map = node.as_mapping().unwrap();
        let seq = map["values"].as_sequence().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].as_scalar(), Some("Active"));
    }

    #[test]
    fn preserves_mapping_order() {
        let decoder = YamlDecoder;
        let node = decoder.decode("x.yaml", "z: 1\na: 2\nm: 3\n").unwrap();
        let map = node.as_mapping().unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn bad_syntax_is_reported() {
        let decoder = YamlDecoder;
        let err = decoder.decode("bad.yaml", "foo: [").unwrap_err();
        match err {
            DslError::BadSyntax { file, .. } => assert_eq!(file, "bad.yaml"),
        }
    }

    #[test]
    fn null_scalar_decodes_to_null_node() {
        let decoder = YamlDecoder;
        let node = decoder.decode("x.yaml", "value: ~\n").unwrap();
        let map = node.as_mapping().unwrap();
        assert!(map["value"].is_null());
    }
}
