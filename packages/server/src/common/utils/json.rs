use serde_json::Value;

/// Borrow a JSON field as a string, treating missing, null, non-string and
/// empty values alike as absent.
pub fn text_field(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}
