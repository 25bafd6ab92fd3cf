use std::collections::BTreeMap;

use serde_json::Value;

use crate::envelope;
use crate::facade::Facade;

/// Entry point for a single JSON request. Parses the request, validates its
/// per-command arguments, and routes through the [`Facade`] — never calling
/// `Engine` directly.
pub struct Router {
    facade: Facade,
}

impl Router {
    pub fn new(facade: Facade) -> Self {
        Self { facade }
    }

    pub fn facade(&self) -> &Facade {
        &self.facade
    }

    /// Handles one raw JSON request string, returning one raw JSON response
    /// string. Never panics: parse failures and argument errors both become
    /// `{status: "error", ...}` responses.
    pub fn handle(&mut self, request: &str) -> String {
        let value: Value = match serde_json::from_str(request) {
            Ok(v) => v,
            Err(e) => return envelope::error(format!("Missing or invalid 'command': {e}")),
        };
        let Some(command) = value.get("command").and_then(Value::as_str) else {
            return envelope::error("Missing or invalid 'command'");
        };

        tracing::info!(command, "handling request");
        let response = self.dispatch(command, &value);
        response
    }

    fn dispatch(&mut self, command: &str, request: &Value) -> String {
        match command {
            "loadSchemas" => match string_map_arg(request, command, "schemas") {
                Ok(bundle) => self.facade.load_schemas(&bundle),
                Err(e) => envelope::error(e.to_string()),
            },
            "getSchemaList" => self.facade.get_schema_list(),
            "getSchema" => match string_arg(request, command, "schema") {
                Ok(name) => self.facade.get_schema(&name),
                Err(e) => envelope::error(e.to_string()),
            },
            "loadData" => match string_map_arg(request, command, "data") {
                Ok(bundle) => self.facade.load_data(&bundle),
                Err(e) => envelope::error(e.to_string()),
            },
            "queryEntity" => match string_arg(request, command, "id") {
                Ok(id) => self.facade.query_entity(&id),
                Err(e) => envelope::error(e.to_string()),
            },
            "setField" => {
                match (string_arg(request, command, "id"), string_arg(request, command, "field"), string_arg(request, command, "value")) {
                    (Ok(id), Ok(field), Ok(value)) => self.facade.set_field(&id, &field, &value),
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => envelope::error(e.to_string()),
                }
            }
            "validateEntity" => match string_arg(request, command, "id") {
                Ok(id) => self.facade.validate_entity(&id),
                Err(e) => envelope::error(e.to_string()),
            },
            "getTree" => self.facade.get_tree(),
            "getRoot" => self.facade.get_root(),
            "getChildren" => match string_arg(request, command, "parentId") {
                Ok(parent_id) => self.facade.get_children(&parent_id),
                Err(e) => envelope::error(e.to_string()),
            },
            "getParent" => match string_arg(request, command, "id") {
                Ok(id) => self.facade.get_parent(&id),
                Err(e) => envelope::error(e.to_string()),
            },
            "createEntity" => self.dispatch_create_entity(request),
            "deleteEntity" => match string_arg(request, command, "id") {
                Ok(id) => self.facade.delete_entity(&id),
                Err(e) => envelope::error(e.to_string()),
            },
            "runCommand" => {
                match (string_arg(request, command, "id"), string_arg(request, command, "command")) {
                    (Ok(id), Ok(cmd)) => self.facade.run_command(&id, &cmd),
                    (Err(e), _) | (_, Err(e)) => envelope::error(e.to_string()),
                }
            }
            other => envelope::error(format!("unknown command '{other}'")),
        }
    }

    fn dispatch_create_entity(&mut self, request: &Value) -> String {
        let schema = match string_arg(request, "createEntity", "schema") {
            Ok(v) => v,
            Err(e) => return envelope::error(e.to_string()),
        };
        let id = match string_arg(request, "createEntity", "id") {
            Ok(v) => v,
            Err(e) => return envelope::error(e.to_string()),
        };
        let parent_id = request.get("parentId").and_then(Value::as_str).map(str::to_string);
        let payload = match request.get("payload").and_then(Value::as_object) {
            Some(map) => map.clone(),
            None => return envelope::error("command 'createEntity' is missing required argument 'payload'"),
        };
        self.facade.create_entity(&schema, &id, parent_id.as_deref(), &payload)
    }
}

fn string_arg(request: &Value, command: &str, name: &str) -> Result<String, String> {
    match request.get(name) {
        None => Err(format!("command '{command}' is missing required argument '{name}'")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("command '{command}' argument '{name}' has the wrong type")),
    }
}

fn string_map_arg(request: &Value, command: &str, name: &str) -> Result<BTreeMap<String, String>, String> {
    match request.get(name).and_then(Value::as_object) {
        None => Err(format!("command '{command}' is missing required argument '{name}'")),
        Some(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                match v.as_str() {
                    Some(s) => {
                        out.insert(k.clone(), s.to_string());
                    }
                    None => return Err(format!("command '{command}' argument '{name}.{k}' has the wrong type")),
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_an_error() {
        let mut router = Router::new(Facade::new());
        let json: Value = serde_json::from_str(&router.handle("{}")).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut router = Router::new(Facade::new());
        let json: Value = serde_json::from_str(&router.handle("not json")).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut router = Router::new(Facade::new());
        let json: Value = serde_json::from_str(&router.handle(r#"{"command":"bogus"}"#)).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn load_schemas_end_to_end() {
        let mut router = Router::new(Facade::new());
        let req = serde_json::json!({
            "command": "loadSchemas",
            "schemas": {"home.yaml": "profile_name: SmartHome\nfields:\n  name:\n    type: string\n"}
        });
        let json: Value = serde_json::from_str(&router.handle(&req.to_string())).unwrap();
        assert_eq!(json["status"], "ok");
        let list: Value = serde_json::from_str(&router.handle(r#"{"command":"getSchemaList"}"#)).unwrap();
        assert_eq!(list["schemas"], serde_json::json!(["SmartHome"]));
    }

    #[test]
    fn create_entity_requires_payload() {
        let mut router = Router::new(Facade::new());
        let req = serde_json::json!({"command": "createEntity", "schema": "SmartHome", "id": "home1"});
        let json: Value = serde_json::from_str(&router.handle(&req.to_string())).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn set_field_missing_argument_reports_which_one() {
        let mut router = Router::new(Facade::new());
        let req = serde_json::json!({"command": "setField", "id": "home1", "field": "name"});
        let json: Value = serde_json::from_str(&router.handle(&req.to_string())).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("value"));
    }
}
