use std::collections::BTreeMap;

use entityloom_core::{Engine, EngineError};
use entityloom_dsl::YamlDecoder;
use entityloom_script::ScriptBridge;
use indexmap::IndexMap;
use serde_json::Value;

use crate::envelope;

/// One method per Engine operation, each returning a JSON envelope string.
/// This is the canonical external contract — the Router never calls
/// `Engine` directly, only ever through a `Facade`.
pub struct Facade {
    engine: Engine,
    script_bridge: Option<ScriptBridge>,
}

impl Facade {
    pub fn new() -> Self {
        Self { engine: Engine::new(), script_bridge: None }
    }

    pub fn with_script_bridge(script_bridge: ScriptBridge) -> Self {
        Self { engine: Engine::new(), script_bridge: Some(script_bridge) }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn load_schemas(&mut self, schemas: &BTreeMap<String, String>) -> String {
        match self.engine.load_schemas(schemas, &YamlDecoder) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn get_schema_list(&self) -> String {
        envelope::ok(serde_json::json!({ "schemas": self.engine.schema_list() }))
    }

    pub fn get_schema(&self, name: &str) -> String {
        match self.engine.get_schema(name) {
            Ok(schema) => envelope::ok(serde_json::json!({ "schema": schema.to_json() })),
            Err(EngineError::UnknownSchema { .. }) => envelope::not_found(),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn load_data(&mut self, data: &BTreeMap<String, String>) -> String {
        match self.engine.load_data(data, &YamlDecoder) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn query_entity(&self, id: &str) -> String {
        match self.engine.entities().get_by_id(id) {
            Some(entity) => envelope::ok(serde_json::json!({ "entity": entity.get_json() })),
            None => envelope::not_found(),
        }
    }

    pub fn set_field(&mut self, id: &str, field: &str, value: &str) -> String {
        match self.engine.set_field(id, field, value) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn validate_entity(&self, id: &str) -> String {
        match self.engine.validate_entity(id) {
            Ok(()) => envelope::ok(serde_json::json!({ "valid": true })),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn get_tree(&self) -> String {
        envelope::ok(serde_json::json!({ "tree": self.engine.tree_json() }))
    }

    pub fn get_root(&self) -> String {
        let roots: Vec<Value> = self.engine.get_parents().into_iter().map(|e| e.get_json()).collect();
        envelope::ok(serde_json::json!({ "root": roots }))
    }

    pub fn get_children(&self, parent_id: &str) -> String {
        let children: Vec<Value> = self.engine.get_children(parent_id).into_iter().map(|e| e.get_json()).collect();
        envelope::ok(serde_json::json!({ "children": children }))
    }

    pub fn get_parent(&self, id: &str) -> String {
        match self.engine.get_parent(id) {
            Some(parent) => envelope::ok(serde_json::json!({ "parent": parent.get_json() })),
            None => envelope::not_found(),
        }
    }

    /// Each payload value is re-serialized as JSON and handed to
    /// `setFromString` so objects/arrays round-trip.
    pub fn create_entity(&mut self, schema: &str, id: &str, parent_id: Option<&str>, payload: &serde_json::Map<String, Value>) -> String {
        let mut raws = IndexMap::with_capacity(payload.len());
        for (key, value) in payload {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            raws.insert(key.clone(), raw);
        }
        match self.engine.create_entity(schema, id, parent_id, &raws) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    pub fn delete_entity(&mut self, id: &str) -> String {
        match self.engine.delete_entity(id) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }

    /// Runs a schema-declared command against an entity. Requires a script
    /// bridge to have been configured; without one, every command fails.
    pub fn run_command(&self, id: &str, command: &str) -> String {
        let Some(bridge) = &self.script_bridge else {
            return envelope::error("no script bridge configured");
        };
        match self.engine.run_command(id, command, bridge) {
            Ok(()) => envelope::ok(Value::Object(Default::default())),
            Err(e) => envelope::error(e.to_string()),
        }
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}
