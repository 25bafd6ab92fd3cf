use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use super::command::Command;
use super::field_schema::FieldSchema;

/// A complete entity schema: name, declared fields, child relations,
/// commands, and whether it may appear as a root of a data bundle.
///
/// `children` and `commands` preserve document declaration order because
/// object/field iteration order is an observable guarantee of the system.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    name: String,
    fields: IndexMap<String, Arc<FieldSchema>>,
    /// relation tag -> target entity schema name. Stored by name, not by
    /// direct reference, so the schema graph can build every `EntitySchema`
    /// in one pass without needing the target to already exist.
    children: IndexMap<String, String>,
    commands: IndexMap<String, Command>,
    is_profile: bool,
}

impl EntitySchema {
    pub fn new(
        name: impl Into<String>,
        fields: IndexMap<String, Arc<FieldSchema>>,
        children: IndexMap<String, String>,
        commands: IndexMap<String, Command>,
        is_profile: bool,
    ) -> Self {
        Self {
            name: name.into(),
            fields,
            children,
            commands,
            is_profile,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldSchema>> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, Arc<FieldSchema>> {
        &self.fields
    }

    pub fn children_tags(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// The target schema name for a relation tag, if declared. Resolving
    /// this to an actual `EntitySchema` is `SchemaGraph`'s job — see
    /// `SchemaGraph::child_schema`.
    pub fn child_target(&self, tag: &str) -> Option<&str> {
        self.children.get(tag).map(String::as_str)
    }

    pub fn command(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    pub fn is_profile(&self) -> bool {
        self.is_profile
    }

    /// `{name, fields: {...}, children: {tag: childName}, commands: [id, ...]}`
    pub fn to_json(&self) -> Value {
        let fields: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        let children: serde_json::Map<String, Value> = self
            .children
            .iter()
            .map(|(tag, target)| (tag.clone(), json!(target)))
            .collect();
        let commands: Vec<Value> = self.commands.keys().map(|id| json!(id)).collect();
        json!({
            "name": self.name,
            "fields": Value::Object(fields),
            "children": Value::Object(children),
            "commands": commands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field_schema::FieldKind;
    use crate::types::FieldName;

    fn make_schema() -> EntitySchema {
        let mut fields = IndexMap::new();
        fields.insert(
            "name".to_string(),
            Arc::new(FieldSchema::new(FieldName::new("name").unwrap(), true, None, FieldKind::Text).unwrap()),
        );
        let mut children = IndexMap::new();
        children.insert("devices".to_string(), "Device".to_string());
        EntitySchema::new("SmartHome", fields, children, IndexMap::new(), true)
    }

    #[test]
    fn accessors() {
        let s = make_schema();
        assert_eq!(s.name(), "SmartHome");
        assert!(s.field("name").is_some());
        assert!(s.field("missing").is_none());
        assert_eq!(s.child_target("devices"), Some("Device"));
        assert!(s.is_profile());
    }

    #[test]
    fn to_json_shape() {
        let s = make_schema();
        let json = s.to_json();
        assert_eq!(json["name"], "SmartHome");
        assert_eq!(json["children"]["devices"], "Device");
        assert_eq!(json["fields"]["name"]["type"], "string");
        assert_eq!(json["commands"], serde_json::json!([]));
    }
}
