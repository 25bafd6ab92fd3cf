use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use entityloom_dsl::{DocumentDecoder, Node};
use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::types::FieldName;

use super::command::Command;
use super::entity_schema::EntitySchema;
use super::field_schema::{FieldKind, FieldSchema};

const TOP_LEVEL_KEYS: &[&str] = &["profile_name", "entity_name", "fields", "children", "commands"];

/// The process-wide schema graph: every entity schema known to the system,
/// keyed by name. Built by a two-pass loader (`load`) that either produces
/// a fully consistent graph or leaves the previous graph untouched.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    schemas: IndexMap<String, Arc<EntitySchema>>,
}

struct PendingDoc {
    file: String,
    name: String,
    is_profile: bool,
    node: Node,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EntitySchema>> {
        self.schemas.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    pub fn child_schema(&self, schema: &EntitySchema, tag: &str) -> Option<&Arc<EntitySchema>> {
        let target = schema.child_target(tag)?;
        self.get(target)
    }

    pub fn clear(&mut self) {
        self.schemas.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Two-pass load: registration (names + shape validation), then
    /// population (fields/children/commands, resolving forward
    /// references by name). Any failure aborts with the graph left
    /// exactly as it was before the call.
    pub fn load(
        &mut self,
        bundle: &BTreeMap<String, String>,
        decoder: &dyn DocumentDecoder,
    ) -> Result<(), SchemaError> {
        let built = Self::build(bundle, decoder)?;
        self.schemas = built;
        tracing::info!(schema_count = self.schemas.len(), "schema graph loaded");
        Ok(())
    }

    fn build(
        bundle: &BTreeMap<String, String>,
        decoder: &dyn DocumentDecoder,
    ) -> Result<IndexMap<String, Arc<EntitySchema>>, SchemaError> {
        // Pass 1 — registration.
        let mut pending = Vec::with_capacity(bundle.len());
        let mut known_names = HashSet::with_capacity(bundle.len());
        for (file, content) in bundle {
            let node = decoder
                .decode(file, content)
                .map_err(|e| SchemaError::WrongShape {
                    file: file.clone(),
                    key: e.to_string(),
                })?;
            let map = node.as_mapping().ok_or_else(|| SchemaError::WrongShape {
                file: file.clone(),
                key: "<document>".into(),
            })?;

            for key in map.keys() {
                if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                    return Err(SchemaError::UnknownTopLevelKey {
                        file: file.clone(),
                        key: key.clone(),
                    });
                }
            }

            let profile_name = map.get("profile_name").and_then(Node::as_scalar);
            let entity_name = map.get("entity_name").and_then(Node::as_scalar);
            let (name, is_profile) = match (profile_name, entity_name) {
                (Some(n), None) => (n.to_string(), true),
                (None, Some(n)) => (n.to_string(), false),
                _ => return Err(SchemaError::MissingNameKey { file: file.clone() }),
            };

            for key in ["fields", "children", "commands"] {
                if let Some(value) = map.get(key) {
                    if value.as_mapping().is_none() && !value.is_null() {
                        return Err(SchemaError::WrongShape { file: file.clone(), key: key.into() });
                    }
                }
            }

            if !known_names.insert(name.clone()) {
                return Err(SchemaError::DuplicateSchema { name });
            }
            pending.push(PendingDoc { file: file.clone(), name, is_profile, node });
        }

        // Pass 2 — population.
        let mut schemas = IndexMap::with_capacity(pending.len());
        for doc in &pending {
            let map = doc.node.as_mapping().expect("validated in pass 1");

            let fields = match map.get("fields").and_then(Node::as_mapping) {
                Some(field_map) => {
                    let mut built_fields = IndexMap::with_capacity(field_map.len());
                    for (key, node) in field_map {
                        let field = build_field(&doc.file, key, node, &known_names)?;
                        built_fields.insert(field.name().to_string(), Arc::new(field));
                    }
                    built_fields
                }
                None => IndexMap::new(),
            };

            let children = match map.get("children").and_then(Node::as_mapping) {
                Some(child_map) => {
                    let mut built_children = IndexMap::with_capacity(child_map.len());
                    for (tag, node) in child_map {
                        let entry = node.as_mapping().ok_or_else(|| SchemaError::WrongShape {
                            file: doc.file.clone(),
                            key: format!("children.{tag}"),
                        })?;
                        let target = entry
                            .get("entity")
                            .and_then(Node::as_scalar)
                            .ok_or_else(|| SchemaError::MissingAttribute {
                                field: tag.clone(),
                                attribute: "entity".into(),
                            })?;
                        if !known_names.contains(target) {
                            return Err(SchemaError::UnknownChildEntity {
                                relation: tag.clone(),
                                name: target.to_string(),
                            });
                        }
                        built_children.insert(tag.clone(), target.to_string());
                    }
                    built_children
                }
                None => IndexMap::new(),
            };

            let commands = match map.get("commands").and_then(Node::as_mapping) {
                Some(command_map) => {
                    let mut built_commands = IndexMap::with_capacity(command_map.len());
                    for (id, node) in command_map {
                        let entry = node.as_mapping().ok_or_else(|| SchemaError::WrongShape {
                            file: doc.file.clone(),
                            key: format!("commands.{id}"),
                        })?;
                        let script_path = entry
                            .get("file")
                            .and_then(Node::as_scalar)
                            .ok_or_else(|| SchemaError::MissingAttribute {
                                field: id.clone(),
                                attribute: "file".into(),
                            })?;
                        let params = match entry.get("params").and_then(Node::as_mapping) {
                            Some(param_map) => param_map
                                .iter()
                                .map(|(k, v)| (k.clone(), v.as_scalar().unwrap_or_default().to_string()))
                                .collect(),
                            None => Default::default(),
                        };
                        built_commands.insert(id.clone(), Command::script(id.clone(), script_path, params));
                    }
                    built_commands
                }
                None => IndexMap::new(),
            };

            schemas.insert(
                doc.name.clone(),
                Arc::new(EntitySchema::new(doc.name.clone(), fields, children, commands, doc.is_profile)),
            );
        }

        Ok(schemas)
    }
}

fn build_field(
    file: &str,
    key: &str,
    node: &Node,
    known_names: &HashSet<String>,
) -> Result<FieldSchema, SchemaError> {
    let map = node.as_mapping().ok_or_else(|| SchemaError::WrongShape {
        file: file.to_string(),
        key: key.to_string(),
    })?;

    let field_name = map.get("name").and_then(Node::as_scalar).unwrap_or(key);
    let name = FieldName::new(field_name)?;
    let required = map
        .get("required")
        .and_then(Node::as_scalar)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let alias = map.get("alias").and_then(Node::as_scalar).map(str::to_string);

    let type_name = map
        .get("type")
        .and_then(Node::as_scalar)
        .ok_or_else(|| SchemaError::MissingAttribute {
            field: field_name.to_string(),
            attribute: "type".into(),
        })?;

    let kind = match type_name {
        "string" => FieldKind::Text,
        "boolean" => FieldKind::Boolean,
        "integer" => FieldKind::Integer {
            min: parse_num(map.get("min"), field_name, "min")?,
            max: parse_num(map.get("max"), field_name, "max")?,
        },
        "float" => FieldKind::Float {
            min: parse_num(map.get("min"), field_name, "min")?,
            max: parse_num(map.get("max"), field_name, "max")?,
        },
        "enum" => {
            let values = map
                .get("values")
                .and_then(Node::as_sequence)
                .ok_or_else(|| SchemaError::MissingAttribute {
                    field: field_name.to_string(),
                    attribute: "values".into(),
                })?;
            if values.is_empty() {
                return Err(SchemaError::EmptyEnumValues { field: field_name.to_string() });
            }
            let values = values.iter().filter_map(Node::as_scalar).map(str::to_string).collect();
            FieldKind::Enum { allowed_values: crate::types::EnumVariants::new(values) }
        }
        "reference" => {
            let target = map
                .get("target")
                .and_then(Node::as_scalar)
                .ok_or_else(|| SchemaError::MissingAttribute {
                    field: field_name.to_string(),
                    attribute: "target".into(),
                })?;
            if !known_names.contains(target) {
                return Err(SchemaError::UnknownReferenceTarget {
                    field: field_name.to_string(),
                    target: target.to_string(),
                });
            }
            FieldKind::Reference { target: crate::types::SchemaName::new(target)? }
        }
        "object" => {
            let nested = map
                .get("fields")
                .and_then(Node::as_mapping)
                .ok_or_else(|| SchemaError::MissingAttribute {
                    field: field_name.to_string(),
                    attribute: "fields".into(),
                })?;
            let mut fields = IndexMap::with_capacity(nested.len());
            for (child_key, child_node) in nested {
                let child = build_field(file, child_key, child_node, known_names)?;
                fields.insert(child.name().to_string(), Arc::new(child));
            }
            FieldKind::Object { fields }
        }
        "array" => {
            let element_node = map
                .get("element")
                .ok_or_else(|| SchemaError::MissingAttribute {
                    field: field_name.to_string(),
                    attribute: "element".into(),
                })?;
            let element = build_field(file, field_name, element_node, known_names)?;
            FieldKind::Array { element: Arc::new(element) }
        }
        other => {
            return Err(SchemaError::UnknownFieldType {
                field: field_name.to_string(),
                type_name: other.to_string(),
            })
        }
    };

    FieldSchema::new(name, required, alias, kind)
}

fn parse_num<T: std::str::FromStr>(
    node: Option<&Node>,
    field: &str,
    attribute: &str,
) -> Result<Option<T>, SchemaError> {
    match node.and_then(Node::as_scalar) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| SchemaError::MissingAttribute {
            field: field.to_string(),
            attribute: attribute.to_string(),
        }),
    }
}
