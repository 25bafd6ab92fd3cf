use mlua::{Lua, Value as LuaValue};
use serde_json::Value;

/// Converts a JSON value into a native Lua value. Objects become Lua tables
/// keyed by string; arrays become Lua tables keyed `1..=n` (Lua's own
/// convention) so the reverse conversion's array-detection heuristic round-trips.
pub fn json_to_lua(lua: &Lua, value: &Value) -> mlua::Result<LuaValue> {
    match value {
        Value::Null => Ok(LuaValue::Nil),
        Value::Bool(b) => Ok(LuaValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(LuaValue::Integer(i))
            } else {
                Ok(LuaValue::Number(n.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(s) => Ok(LuaValue::String(lua.create_string(s)?)),
        Value::Array(items) => {
            let table = lua.create_table()?;
            for (i, item) in items.iter().enumerate() {
                table.set(i + 1, json_to_lua(lua, item)?)?;
            }
            Ok(LuaValue::Table(table))
        }
        Value::Object(map) => {
            let table = lua.create_table()?;
            for (k, v) in map {
                table.set(k.clone(), json_to_lua(lua, v)?)?;
            }
            Ok(LuaValue::Table(table))
        }
    }
}

/// Converts a Lua value back into JSON. A table is an array iff every key is
/// a positive integer and the keys are exactly `1..=len` with no gaps;
/// otherwise it is an object.
pub fn lua_to_json(value: &LuaValue) -> mlua::Result<Value> {
    match value {
        LuaValue::Nil => Ok(Value::Null),
        LuaValue::Boolean(b) => Ok(Value::Bool(*b)),
        LuaValue::Integer(i) => Ok(Value::from(*i)),
        LuaValue::Number(n) => Ok(serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)),
        LuaValue::String(s) => Ok(Value::String(s.to_str()?.to_string())),
        LuaValue::Table(table) => {
            let mut int_keys: Vec<i64> = Vec::new();
            let mut is_array = true;
            for pair in table.clone().pairs::<LuaValue, LuaValue>() {
                let (key, _) = pair?;
                match key {
                    LuaValue::Integer(i) if i > 0 => int_keys.push(i),
                    _ => {
                        is_array = false;
                        break;
                    }
                }
            }
            if is_array {
                int_keys.sort_unstable();
                is_array = int_keys.iter().enumerate().all(|(idx, &k)| k as usize == idx + 1);
            }
            if is_array {
                let len = int_keys.len();
                let mut items = Vec::with_capacity(len);
                for i in 1..=len {
                    let v: LuaValue = table.get(i as i64)?;
                    items.push(lua_to_json(&v)?);
                }
                Ok(Value::Array(items))
            } else {
                let mut map = serde_json::Map::new();
                for pair in table.clone().pairs::<String, LuaValue>() {
                    let (k, v) = pair?;
                    map.insert(k, lua_to_json(&v)?);
                }
                Ok(Value::Object(map))
            }
        }
        other => Err(mlua::Error::ToLuaConversionError {
            from: "lua value",
            to: "json",
            message: Some(format!("unsupported Lua value: {other:?}")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    #[test]
    fn round_trips_object() {
        let lua = Lua::new();
        let json = serde_json::json!({"mode": "eco", "volume": 50});
        let lua_value = json_to_lua(&lua, &json).unwrap();
        let back = lua_to_json(&lua_value).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn round_trips_array() {
        let lua = Lua::new();
        let json = serde_json::json!([1, 2, 3]);
        let lua_value = json_to_lua(&lua, &json).unwrap();
        let back = lua_to_json(&lua_value).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn empty_table_is_treated_as_array() {
        let lua = Lua::new();
        let table = lua.create_table().unwrap();
        let json = lua_to_json(&LuaValue::Table(table)).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }
}
