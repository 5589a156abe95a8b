//! Helpers for opaque parameter values.

use serde_json::Value;

use super::error::DomainError;

/// A value counts as present unless it is null or the empty string.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Render a value the way it appears inside a URL, query or message.
///
/// Strings are used raw, null becomes empty, integral floats drop the
/// fractional part, and structured values become compact JSON.
pub fn to_plain_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64()
                && let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() < 9_007_199_254_740_992.0
            {
                format!("{f:.0}")
            } else {
                n.to_string()
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Parse a JSON-typed parameter.
///
/// Strings are decoded as JSON; any other value is already structured and is
/// returned unchanged.
///
/// # Errors
/// Returns `DomainError::InvalidJsonParameter` naming `name` when a string
/// does not hold valid JSON.
pub fn parse_json_parameter(name: &str, value: Value) -> Result<Value, DomainError> {
    match value {
        Value::String(raw) => {
            serde_json::from_str(&raw).map_err(|e| DomainError::invalid_json(name, e.to_string()))
        }
        other => Ok(other),
    }
}
