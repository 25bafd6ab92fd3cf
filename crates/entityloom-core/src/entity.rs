use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::ValueError;
use crate::registry::EntityManager;
use crate::schema::EntitySchema;
use crate::types::EntityId;
use crate::value::FieldValue;

/// The lifecycle state of an entity, rendered on the wire as
/// `"Unchanged"|"Added"|"Modified"|"Deleted"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

impl EntityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "Unchanged",
            Self::Added => "Added",
            Self::Modified => "Modified",
            Self::Deleted => "Deleted",
        }
    }
}

/// A live entity: identity, optional parent link, the schema it was built
/// from, and one [`FieldValue`] per declared field.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    parent_id: Option<EntityId>,
    schema: Arc<EntitySchema>,
    fields: IndexMap<String, FieldValue>,
    state: EntityState,
}

impl Entity {
    /// Eagerly instantiates one empty [`FieldValue`] per declared field,
    /// tag-dispatching the value factory on each field's schema.
    pub fn new(id: EntityId, parent_id: Option<EntityId>, schema: Arc<EntitySchema>, state: EntityState) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|(name, field_schema)| (name.clone(), FieldValue::empty(field_schema.clone())))
            .collect();
        Self { id, parent_id, schema, fields, state }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&EntityId> {
        self.parent_id.as_ref()
    }

    pub fn set_parent_id(&mut self, parent_id: Option<EntityId>) {
        self.parent_id = parent_id;
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut IndexMap<String, FieldValue> {
        &mut self.fields
    }

    /// Routes to the named field's `set_from_string`. Fails with
    /// [`ValueError::UnknownField`] if no such field is declared.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), ValueError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ValueError::UnknownField { field: name.to_string() })?;
        field.set_from_string(raw)
    }

    /// Validates fields in declaration order; surfaces the first failure.
    pub fn validate(&self, registry: &EntityManager) -> Result<(), ValueError> {
        for (name, value) in &self.fields {
            if value.schema().is_required() && value.is_empty() {
                return Err(ValueError::MissingRequired { field: name.clone() });
            }
            value.validate(registry)?;
        }
        Ok(())
    }

    /// Each field's human-readable rendering, keyed by field name.
    pub fn get_dict(&self) -> IndexMap<String, String> {
        self.fields.iter().map(|(k, v)| (k.clone(), v.to_display_string())).collect()
    }

    /// `{id, schema, parentId (or null), <field>: <fieldValueJson>, …, state}`
    pub fn get_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), json!(self.id.as_str()));
        map.insert("schema".into(), json!(self.schema.name()));
        map.insert(
            "parentId".into(),
            self.parent_id.as_ref().map(|id| json!(id.as_str())).unwrap_or(Value::Null),
        );
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        map.insert("state".into(), json!(self.state.as_str()));
        Value::Object(map)
    }
}
