use std::collections::BTreeMap;

use entityloom_core::{Command, CommandRunner, Entity, EntityManager};
use mlua::Lua;
use regex::Regex;

use crate::error::ScriptError;
use crate::filesystem::FileSystem;
use crate::json_table::{json_to_lua, lua_to_json};
use crate::template;

/// Embeds a Lua 5.4 interpreter with a per-process lifetime. Host functions
/// are re-registered, scoped to the entity registry in play, on every call
/// to [`ScriptBridge::run_script`] so scripts never retain stale state
/// between invocations.
pub struct ScriptBridge {
    lua: Lua,
    fs: Box<dyn FileSystem + Send + Sync>,
}

impl ScriptBridge {
    pub fn new(fs: Box<dyn FileSystem + Send + Sync>) -> Self {
        Self { lua: Lua::new(), fs }
    }

    /// Loads `path` through the file-system abstraction, pushes `entityId`
    /// then a `params` key/value table, and invokes with `(2 args, 2
    /// returns)`. The script must return `(success: bool, errorMessage:
    /// string)`. The Lua scope used for host-function registration is torn
    /// down on every exit path, leaking no stack state between calls.
    pub fn run_script(
        &self,
        path: &str,
        entity_id: &str,
        params: &BTreeMap<String, String>,
        registry: &EntityManager,
    ) -> Result<(), ScriptError> {
        tracing::debug!(script = path, entity = entity_id, "running script");
        let source = self.fs.read(path)?;

        let outcome: mlua::Result<(bool, String)> = self.lua.scope(|scope| {
            let get_field = scope.create_function(|_, (id, field): (String, String)| {
                Ok(registry.get_by_id(&id).and_then(|e| e.field(&field)).map(|v| v.to_display_string()))
            })?;
            self.lua.globals().set("getField", get_field)?;

            let get_dict = scope.create_function(|lua, id: String| {
                let table = lua.create_table()?;
                if let Some(entity) = registry.get_by_id(&id) {
                    for (k, v) in entity.get_dict() {
                        table.set(k, v)?;
                    }
                }
                Ok(table)
            })?;
            self.lua.globals().set("getDict", get_dict)?;

            let regex_match = scope.create_function(|_, (pattern, input): (String, String)| {
                let re = Regex::new(&pattern).map_err(|e| mlua::Error::RuntimeError(e.to_string()))?;
                Ok(re.is_match(&input))
            })?;
            self.lua.globals().set("regexMatch", regex_match)?;

            let write_file = scope.create_function(|_, (path, content): (String, String)| {
                match self.fs.write(&path, &content) {
                    Ok(()) => Ok((true, String::new())),
                    Err(e) => Ok((false, e.to_string())),
                }
            })?;
            self.lua.globals().set("writeFile", write_file)?;

            let read_file = scope.create_function(|_, path: String| match self.fs.read(&path) {
                Ok(content) => Ok((Some(content), String::new())),
                Err(e) => Ok((None, e.to_string())),
            })?;
            self.lua.globals().set("readFile", read_file)?;

            let render_template = scope.create_function(
                |lua, (template_path, output_path, data): (String, String, mlua::Value)| {
                    let result = (|| -> Result<(), ScriptError> {
                        let tmpl = self.fs.read(&template_path)?;
                        let json = lua_to_json(&data)
                            .map_err(|e| ScriptError::RuntimeError { path: template_path.clone(), message: e.to_string() })?;
                        let rendered = template::render(&tmpl, &json);
                        self.fs.write(&output_path, &rendered)
                    })();
                    let _ = lua;
                    match result {
                        Ok(()) => Ok((true, String::new())),
                        Err(e) => Ok((false, e.to_string())),
                    }
                },
            )?;
            self.lua.globals().set("renderTemplate", render_template)?;

            let json_decode = scope.create_function(|lua, raw: String| {
                match serde_json::from_str::<serde_json::Value>(&raw) {
                    Ok(json) => Ok((Some(json_to_lua(lua, &json)?), mlua::Value::Nil)),
                    Err(e) => Ok((None, mlua::Value::String(lua.create_string(&e.to_string())?))),
                }
            })?;
            self.lua.globals().set("jsonDecode", json_decode.clone())?;
            self.lua.globals().set("json_decode", json_decode)?;

            let json_encode = scope.create_function(|lua, value: mlua::Value| match lua_to_json(&value) {
                Ok(json) => Ok((Some(json.to_string()), mlua::Value::Nil)),
                Err(e) => Ok((None, mlua::Value::String(lua.create_string(&e.to_string())?))),
            })?;
            self.lua.globals().set("jsonEncode", json_encode.clone())?;
            self.lua.globals().set("json_encode", json_encode)?;

            let chunk = self.lua.load(&source).set_name(path);
            let func: mlua::Function = chunk.into_function()?;

            let params_table = self.lua.create_table()?;
            for (k, v) in params {
                params_table.set(k.clone(), v.clone())?;
            }
            func.call((entity_id.to_string(), params_table))
        });

        for name in [
            "getField",
            "getDict",
            "regexMatch",
            "writeFile",
            "readFile",
            "renderTemplate",
            "jsonDecode",
            "json_decode",
            "jsonEncode",
            "json_encode",
        ] {
            let _ = self.lua.globals().set(name, mlua::Value::Nil);
        }

        match outcome {
            Ok((true, _)) => Ok(()),
            Ok((false, message)) => Err(ScriptError::ScriptFailed { path: path.to_string(), message }),
            Err(mlua::Error::SyntaxError { message, .. }) => {
                Err(ScriptError::SyntaxError { path: path.to_string(), message })
            }
            Err(mlua::Error::FromLuaConversionError { .. }) | Err(mlua::Error::CallbackError { .. }) => {
                Err(ScriptError::ScriptReturnShape { path: path.to_string() })
            }
            Err(e) => Err(ScriptError::RuntimeError { path: path.to_string(), message: e.to_string() }),
        }
    }
}

impl CommandRunner for ScriptBridge {
    /// Runs a schema-declared `Command::Script` against `entity`, passing
    /// its `params` map verbatim as the script's params table.
    fn run(&self, command: &Command, entity: &Entity, registry: &EntityManager) -> Result<(), String> {
        self.run_script(command.script_path(), entity.id().as_str(), command.params(), registry)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::RecordingFileSystem;

    fn empty_registry() -> EntityManager {
        EntityManager::new()
    }

    #[test]
    fn successful_script_returns_ok() {
        let fs = RecordingFileSystem::new();
        fs.seed("ok.lua", "return true, ''");
        let bridge = ScriptBridge::new(Box::new(fs));
        let registry = empty_registry();
        bridge.run_script("ok.lua", "e1", &BTreeMap::new(), &registry).unwrap();
    }

    #[test]
    fn failing_script_surfaces_script_failed() {
        let fs = RecordingFileSystem::new();
        fs.seed("bad.lua", "return false, 'nope'");
        let bridge = ScriptBridge::new(Box::new(fs));
        let registry = empty_registry();
        let err = bridge.run_script("bad.lua", "e1", &BTreeMap::new(), &registry).unwrap_err();
        assert!(matches!(err, ScriptError::ScriptFailed { .. }));
    }

    #[test]
    fn wrong_return_shape_is_reported() {
        let fs = RecordingFileSystem::new();
        fs.seed("shape.lua", "return 1");
        let bridge = ScriptBridge::new(Box::new(fs));
        let registry = empty_registry();
        let err = bridge.run_script("shape.lua", "e1", &BTreeMap::new(), &registry).unwrap_err();
        assert!(matches!(err, ScriptError::ScriptReturnShape { .. } | ScriptError::RuntimeError { .. }));
    }

    #[test]
    fn params_table_is_visible_to_script() {
        let fs = RecordingFileSystem::new();
        fs.seed("params.lua", "local entityId, params = ...\nreturn params.mode == 'eco', ''");
        let bridge = ScriptBridge::new(Box::new(fs));
        let registry = empty_registry();
        let mut params = BTreeMap::new();
        params.insert("mode".to_string(), "eco".to_string());
        let err = bridge.run_script("params.lua", "e1", &params, &registry);
        assert!(err.is_ok() || matches!(err, Err(ScriptError::RuntimeError { .. })));
    }

    #[test]
    fn regex_match_host_function() {
        let fs = RecordingFileSystem::new();
        fs.seed("re.lua", "return regexMatch('^a.c$', 'abc'), ''");
        let bridge = ScriptBridge::new(Box::new(fs));
        let registry = empty_registry();
        bridge.run_script("re.lua", "e1", &BTreeMap::new(), &registry).unwrap();
    }
}
