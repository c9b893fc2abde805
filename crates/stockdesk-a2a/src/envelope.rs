//! Request envelope handling for `POST /a2a`.

use serde_json::Value;

/// JSON's notion of "nothing was sent": null, false, zero, or an empty
/// string, array or object.
pub fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Pull the user's text out of one of the accepted shapes:
///
/// - `{"message": "text"}`
/// - `{"message": {"parts": [{"text": ".."}, ".."]}}` (parts concatenated)
/// - `{"message": {"text": ".."}}`
/// - `{"text": ".."}`
/// - `{"query": ".."}`
///
/// Returns an empty string when nothing matches.
pub fn extract_message_text(body: &Value) -> String {
    if let Some(message) = body.get("message") {
        return match message {
            Value::String(s) => s.clone(),
            Value::Object(obj) => {
                if let Some(parts) = obj.get("parts") {
                    parts
                        .as_array()
                        .map(|parts| parts.iter().filter_map(part_text).collect())
                        .unwrap_or_default()
                } else {
                    obj.get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                }
            }
            _ => String::new(),
        };
    }

    ["text", "query"]
        .iter()
        .find_map(|key| body.get(*key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn part_text(part: &Value) -> Option<&str> {
    match part {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_parts_are_concatenated() {
        let body = json!({
            "message": { "role": "user", "parts": [{ "text": "USD/INR " }, "outlook", { "kind": "x" }] }
        });
        assert_eq!(extract_message_text(&body), "USD/INR outlook");
    }

    #[test]
    fn accepted_shapes() {
        assert_eq!(extract_message_text(&json!({ "message": "ping" })), "ping");
        assert_eq!(extract_message_text(&json!({ "message": { "text": "ping" } })), "ping");
        assert_eq!(extract_message_text(&json!({ "text": "ping" })), "ping");
        assert_eq!(extract_message_text(&json!({ "query": "ping" })), "ping");
    }

    #[test]
    fn message_key_shadows_top_level_text() {
        let body = json!({ "message": 42, "text": "ignored" });
        assert_eq!(extract_message_text(&body), "");
    }

    #[test]
    fn unrecognised_shapes_yield_nothing() {
        assert_eq!(extract_message_text(&json!({ "foo": "bar" })), "");
        assert_eq!(extract_message_text(&json!([1, 2])), "");
        assert_eq!(extract_message_text(&json!({ "message": { "parts": "text" } })), "");
    }

    #[test]
    fn empty_bodies() {
        assert!(is_empty_body(&json!({})));
        assert!(is_empty_body(&json!(null)));
        assert!(is_empty_body(&json!([])));
        assert!(is_empty_body(&json!("")));
        assert!(!is_empty_body(&json!({ "foo": "bar" })));
    }
}
