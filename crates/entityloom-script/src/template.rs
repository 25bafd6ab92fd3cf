use serde_json::Value;

/// A minimal moustache-style substitution: `{{key}}` is replaced by the
/// stringified JSON scalar at `data[key]`, or the literal `[array]`/`{object}`
/// marker for compound values. Unknown keys are left untouched.
pub fn render(template: &str, data: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = after[..end].trim();
        out.push_str(&render_key(data, key));
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn render_key(data: &Value, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(_)) => "[array]".to_string(),
        Some(Value::Object(_)) => "{object}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_scalars() {
        let data = serde_json::json!({"name": "Villa", "volume": 50, "active": true});
        assert_eq!(render("Home: {{name}} ({{volume}}, {{active}})", &data), "Home: Villa (50, true)");
    }

    #[test]
    fn compound_values_render_markers() {
        let data = serde_json::json!({"tags": [1, 2], "settings": {"a": 1}});
        assert_eq!(render("{{tags}} {{settings}}", &data), "[array] {object}");
    }

    #[test]
    fn unknown_key_renders_empty() {
        let data = serde_json::json!({});
        assert_eq!(render("x={{missing}}", &data), "x=");
    }

    #[test]
    fn unterminated_tag_passes_through() {
        let data = serde_json::json!({});
        assert_eq!(render("a {{oops", &data), "a {{oops");
    }
}
