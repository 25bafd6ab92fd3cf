use std::sync::Arc;

use entityloom_dsl::Node;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ValueError;
use crate::registry::EntityManager;
use crate::schema::{FieldKind, FieldSchema};
use crate::types::EntityId;

/// A value tree mirroring the shape of a [`FieldSchema`]. Every `FieldValue`
/// holds the schema it was built from, so it always knows how to parse,
/// validate, and render itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    schema: Arc<FieldSchema>,
    data: FieldData,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldData {
    Text(Option<String>),
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(Option<bool>),
    Enum(Option<String>),
    Reference(Option<EntityId>),
    Object(IndexMap<String, FieldValue>),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// The value factory: builds a fresh, empty value whose shape mirrors
    /// `schema` exactly — object values eagerly contain one empty child per
    /// declared field, arrays start with zero elements.
    pub fn empty(schema: Arc<FieldSchema>) -> Self {
        let data = match schema.kind() {
            FieldKind::Text => FieldData::Text(None),
            FieldKind::Integer { .. } => FieldData::Integer(None),
            FieldKind::Float { .. } => FieldData::Float(None),
            FieldKind::Boolean => FieldData::Boolean(None),
            FieldKind::Enum { .. } => FieldData::Enum(None),
            FieldKind::Reference { .. } => FieldData::Reference(None),
            FieldKind::Object { fields } => {
                let children = fields
                    .iter()
                    .map(|(name, field_schema)| (name.clone(), FieldValue::empty(field_schema.clone())))
                    .collect();
                FieldData::Object(children)
            }
            FieldKind::Array { .. } => FieldData::Array(Vec::new()),
        };
        Self { schema, data }
    }

    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    /// Parses a single raw scalar (or, for object/array fields, a raw JSON
    /// fragment) into this value. Only checks syntactic shape — range,
    /// enum membership, and reference existence are deferred to
    /// [`FieldValue::validate`].
    pub fn set_from_string(&mut self, raw: &str) -> Result<(), ValueError> {
        let field = self.schema.name().to_string();
        match self.schema.kind() {
            FieldKind::Text => self.data = FieldData::Text(Some(raw.to_string())),
            FieldKind::Integer { .. } => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| ValueError::BadValueFormat { field: field.clone(), got: raw.to_string() })?;
                self.data = FieldData::Integer(Some(n));
            }
            FieldKind::Float { .. } => {
                let n: f64 = raw
                    .parse()
                    .map_err(|_| ValueError::BadValueFormat { field: field.clone(), got: raw.to_string() })?;
                self.data = FieldData::Float(Some(n));
            }
            FieldKind::Boolean => {
                let b = parse_bool(raw).ok_or_else(|| ValueError::BadValueFormat {
                    field: field.clone(),
                    got: raw.to_string(),
                })?;
                self.data = FieldData::Boolean(Some(b));
            }
            FieldKind::Enum { .. } => {
                let s = raw.trim_matches(|c| c == '"' || c == '\'').to_string();
                self.data = FieldData::Enum(Some(s));
            }
            FieldKind::Reference { .. } => {
                self.data = FieldData::Reference(Some(EntityId::new(raw)));
            }
            FieldKind::Object { .. } | FieldKind::Array { .. } => {
                let json: Value = serde_json::from_str(raw).map_err(|e| ValueError::MalformedStructure {
                    field: field.clone(),
                    message: e.to_string(),
                })?;
                let node = json_to_node(&json);
                self.populate_from_node(&node)?;
            }
        }
        Ok(())
    }

    /// Populates this value from an already-decoded [`Node`] tree — the
    /// data-bundle loading path. Scalar schemas expect scalar nodes, object
    /// schemas expect mapping nodes, array schemas expect sequence nodes.
    pub fn populate_from_node(&mut self, node: &Node) -> Result<(), ValueError> {
        let field = self.schema.name().to_string();
        match (self.schema.kind(), node) {
            (_, Node::Null) => {}
            (FieldKind::Object { fields }, Node::Mapping(map)) => {
                for key in map.keys() {
                    if !fields.contains_key(key) {
                        return Err(ValueError::UnknownField { field: key.clone() });
                    }
                }
                let FieldData::Object(children) = &mut self.data else { unreachable!() };
                for (name, child) in children.iter_mut() {
                    if let Some(child_node) = map.get(name) {
                        child.populate_from_node(child_node)?;
                    }
                }
            }
            (FieldKind::Array { element }, Node::Sequence(items)) => {
                let mut built = Vec::with_capacity(items.len());
                for item in items {
                    let mut value = FieldValue::empty(element.clone());
                    value.populate_from_node(item)?;
                    built.push(value);
                }
                self.data = FieldData::Array(built);
            }
            (_, Node::Scalar(s)) => self.set_from_string(s)?,
            (FieldKind::Object { .. } | FieldKind::Array { .. }, _) => {
                return Err(ValueError::MalformedStructure {
                    field,
                    message: "expected a mapping or sequence node".into(),
                })
            }
            (_, _) => {
                return Err(ValueError::MalformedStructure {
                    field,
                    message: "expected a scalar node".into(),
                })
            }
        }
        Ok(())
    }

    /// Enforces required-ness and every schema-specific rule (range, enum
    /// membership, reference existence). Bottom-up: an object/array
    /// validates iff every child validates.
    pub fn validate(&self, registry: &EntityManager) -> Result<(), ValueError> {
        if self.schema.is_required() && self.is_empty() {
            return Err(ValueError::MissingRequired { field: self.schema.name().to_string() });
        }
        match (self.schema.kind(), &self.data) {
            (FieldKind::Integer { min, max }, FieldData::Integer(Some(n))) => {
                if min.is_some_and(|m| *n < m) || max.is_some_and(|m| *n > m) {
                    return Err(ValueError::OutOfRange { field: self.schema.name().to_string(), got: n.to_string() });
                }
            }
            (FieldKind::Float { min, max }, FieldData::Float(Some(n))) => {
                if min.is_some_and(|m| *n < m) || max.is_some_and(|m| *n > m) {
                    return Err(ValueError::OutOfRange { field: self.schema.name().to_string(), got: n.to_string() });
                }
            }
            (FieldKind::Enum { allowed_values }, FieldData::Enum(Some(s))) => {
                if !allowed_values.contains(s) {
                    return Err(ValueError::NotAVariant { field: self.schema.name().to_string(), got: s.clone() });
                }
            }
            (FieldKind::Reference { target }, FieldData::Reference(Some(id))) => {
                match registry.get_by_id(id.as_str()) {
                    Some(entity) if entity.schema().name() == target.as_str() => {}
                    _ => {
                        return Err(ValueError::DanglingReference {
                            field: self.schema.name().to_string(),
                            target_id: id.to_string(),
                        })
                    }
                }
            }
            (FieldKind::Object { .. }, FieldData::Object(children)) => {
                for child in children.values() {
                    child.validate(registry)?;
                }
            }
            (FieldKind::Array { .. }, FieldData::Array(items)) => {
                for item in items {
                    item.validate(registry)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Cascade-delete sweep: clears this value if it is a reference to a
    /// deleted id, otherwise recurses into object/array children.
    pub fn clear_dangling_references(&mut self, deleted: &std::collections::HashSet<String>) {
        match &mut self.data {
            FieldData::Reference(Some(id)) if deleted.contains(id.as_str()) => {
                self.data = FieldData::Reference(None);
            }
            FieldData::Object(children) => {
                for child in children.values_mut() {
                    child.clear_dangling_references(deleted);
                }
            }
            FieldData::Array(items) => {
                for item in items {
                    item.clear_dangling_references(deleted);
                }
            }
            _ => {}
        }
    }

    /// Human-readable rendering. Arrays render as `[e1, e2, …]`; objects
    /// render as `{k1: v1, k2: v2}` with string children quoted; empty
    /// optional values render as the empty string.
    pub fn to_display_string(&self) -> String {
        match &self.data {
            FieldData::Text(v) => v.clone().unwrap_or_default(),
            FieldData::Integer(v) => v.map(|n| n.to_string()).unwrap_or_default(),
            FieldData::Float(v) => v.map(|n| n.to_string()).unwrap_or_default(),
            FieldData::Boolean(v) => v.map(|b| b.to_string()).unwrap_or_default(),
            FieldData::Enum(v) => v.clone().unwrap_or_default(),
            FieldData::Reference(v) => v.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            FieldData::Array(items) => {
                format!("[{}]", items.iter().map(FieldValue::to_display_string).collect::<Vec<_>>().join(", "))
            }
            FieldData::Object(children) => {
                let rendered: Vec<String> = children
                    .iter()
                    .map(|(k, v)| {
                        let rendered_value = match &v.data {
                            FieldData::Text(_) | FieldData::Enum(_) => format!("\"{}\"", v.to_display_string()),
                            _ => v.to_display_string(),
                        };
                        format!("{k}: {rendered_value}")
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }

    /// Canonical on-the-wire JSON form.
    pub fn to_json(&self) -> Value {
        match &self.data {
            FieldData::Text(v) | FieldData::Enum(v) => v.clone().map(Value::String).unwrap_or(Value::Null),
            FieldData::Integer(v) => v.map(|n| Value::from(n)).unwrap_or(Value::Null),
            FieldData::Float(v) => v.map(|n| Value::from(n)).unwrap_or(Value::Null),
            FieldData::Boolean(v) => v.map(Value::Bool).unwrap_or(Value::Null),
            FieldData::Reference(v) => v.as_ref().map(|id| Value::String(id.to_string())).unwrap_or(Value::Null),
            FieldData::Array(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldData::Object(children) => {
                let map: serde_json::Map<String, Value> =
                    children.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                Value::Object(map)
            }
        }
    }

    /// Primitives empty iff unset; references empty iff no id; arrays empty
    /// iff no elements; objects empty iff every child is empty.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            FieldData::Text(v) => v.as_ref().is_none_or(|s| s.is_empty()),
            FieldData::Integer(v) => v.is_none(),
            FieldData::Float(v) => v.is_none(),
            FieldData::Boolean(v) => v.is_none(),
            FieldData::Enum(v) => v.is_none(),
            FieldData::Reference(v) => v.is_none(),
            FieldData::Array(items) => items.is_empty(),
            FieldData::Object(children) => children.values().all(FieldValue::is_empty),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn json_to_node(value: &Value) -> Node {
    match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Scalar(b.to_string()),
        Value::Number(n) => Node::Scalar(n.to_string()),
        Value::String(s) => Node::Scalar(s.clone()),
        Value::Array(items) => Node::Sequence(items.iter().map(json_to_node).collect()),
        Value::Object(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), json_to_node(v));
            }
            Node::Mapping(out)
        }
    }
}
