use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::SchemaError;
use crate::types::{EnumVariants, FieldName, SchemaName};

/// The declared shape of one field on an entity schema, or of a nested
/// object/array field. Immutable once built by the schema loader.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    name: FieldName,
    required: bool,
    alias: String,
    kind: FieldKind,
}

/// The per-variant payload of a [`FieldSchema`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Integer { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f64>, max: Option<f64> },
    Boolean,
    Enum { allowed_values: EnumVariants },
    Reference { target: SchemaName },
    Object { fields: IndexMap<String, Arc<FieldSchema>> },
    Array { element: Arc<FieldSchema> },
}

impl FieldSchema {
    /// Builds a field schema, validating the range invariant for
    /// `integer`/`float` kinds (`min <= max` when both are present).
    ///
    /// `alias` defaults to `name` when `None` — a field's alias is always
    /// present after construction, per the source's `buildConfig`.
    pub fn new(
        name: FieldName,
        required: bool,
        alias: Option<String>,
        kind: FieldKind,
    ) -> Result<Self, SchemaError> {
        if let FieldKind::Integer { min: Some(min), max: Some(max) } = &kind {
            if min > max {
                return Err(SchemaError::InvalidRange { field: name.to_string() });
            }
        }
        if let FieldKind::Float { min: Some(min), max: Some(max) } = &kind {
            if min > max {
                return Err(SchemaError::InvalidRange { field: name.to_string() });
            }
        }
        let alias = alias.unwrap_or_else(|| name.as_str().to_string());
        Ok(Self { name, required, alias, kind })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The wire-level type discriminant: `string`, `integer`, `float`,
    /// `boolean`, `enum`, `reference`, `object`, or `array`.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            FieldKind::Text => "string",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Float { .. } => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Reference { .. } => "reference",
            FieldKind::Object { .. } => "object",
            FieldKind::Array { .. } => "array",
        }
    }

    /// Serializes this field schema into the stable `toJson()` contract:
    /// `{type, required, alias, ...variant-fields}`, with nested
    /// object/array schemas recursing under `fields`/`element`.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!(self.type_name()));
        map.insert("required".into(), json!(self.required));
        map.insert("alias".into(), json!(self.alias));
        match &self.kind {
            FieldKind::Text | FieldKind::Boolean => {}
            FieldKind::Integer { min, max } => {
                if let Some(min) = min {
                    map.insert("min".into(), json!(min));
                }
                if let Some(max) = max {
                    map.insert("max".into(), json!(max));
                }
            }
            FieldKind::Float { min, max } => {
                if let Some(min) = min {
                    map.insert("min".into(), json!(min));
                }
                if let Some(max) = max {
                    map.insert("max".into(), json!(max));
                }
            }
            FieldKind::Enum { allowed_values } => {
                map.insert("values".into(), json!(allowed_values.as_slice()));
            }
            FieldKind::Reference { target } => {
                map.insert("target".into(), json!(target.as_str()));
            }
            FieldKind::Object { fields } => {
                let nested: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                map.insert("fields".into(), Value::Object(nested));
            }
            FieldKind::Array { element } => {
                map.insert("element".into(), element.to_json());
            }
        }
        Value::Object(map)
    }
}
