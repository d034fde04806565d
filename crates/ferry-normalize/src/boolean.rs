//! Lenient boolean parsing for CMS flag fields.

use serde_json::Value;

/// Parse a boolean-ish string: `true/false`, `1/0`, `yes/no`, `on/off`,
/// case-insensitively. Anything else, including the empty string, is `false`.
#[must_use]
pub fn parse_boolean(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Boolean value of a JSON field that may be a bool, a number or a string.
/// Absent and `null` are `false`.
#[must_use]
pub fn value_as_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| (v - 1.0).abs() < f64::EPSILON),
        Some(Value::String(s)) => parse_boolean(s),
        _ => false,
    }
}
