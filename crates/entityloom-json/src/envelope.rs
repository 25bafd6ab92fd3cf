use serde_json::Value;

/// Builds the stable `{status, ...}` response shape. `status` is always one
/// of `"ok"`, `"error"`, `"not_found"`; on success, `payload`'s own top-level
/// keys are merged in alongside `status` so the shape never drifts between
/// handlers — callers always produce a JSON object as their payload.
pub fn ok(payload: Value) -> String {
    merge("ok", payload).to_string()
}

pub fn error(message: impl Into<String>) -> String {
    serde_json::json!({"status": "error", "message": message.into()}).to_string()
}

pub fn not_found() -> String {
    serde_json::json!({"status": "not_found"}).to_string()
}

fn merge(status: &str, payload: Value) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("result".to_string(), other);
            map
        }
    };
    map.insert("status".to_string(), Value::String(status.to_string()));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_merges_payload_keys() {
        let json = ok(serde_json::json!({"id": "x"}));
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["id"], "x");
    }

    #[test]
    fn ok_envelope_wraps_non_object_payloads() {
        let json = ok(serde_json::json!(["a", "b"]));
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["result"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn error_envelope_carries_message() {
        let json = error("boom");
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["message"], "boom");
    }

    #[test]
    fn not_found_has_no_message() {
        let parsed: Value = serde_json::from_str(&not_found()).unwrap();
        assert_eq!(parsed["status"], "not_found");
        assert!(parsed.get("message").is_none());
    }
}
