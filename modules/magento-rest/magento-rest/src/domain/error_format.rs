//! Human-readable messages from Magento error bodies.
//!
//! Magento reports errors as a template plus arguments:
//!
//! ```json
//! {"message": "The \"%1\" attribute name is invalid.", "parameters": ["id"]}
//! ```
//!
//! Positional `%N` placeholders index into an array of parameters; named
//! `%key` placeholders look up an object of parameters.

use serde_json::Value;

use super::values::to_plain_string;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Format a remote error body for display.
pub fn format_remote_error(body: Option<&Value>) -> String {
    let Some(body) = body.filter(|b| !is_blank(b)) else {
        return UNKNOWN_ERROR.to_owned();
    };

    let object = match body {
        Value::String(s) => return s.clone(),
        Value::Object(object) => object,
        other => return other.to_string(),
    };

    let Some(message) = object.get("message").and_then(message_text) else {
        return body.to_string();
    };

    match object.get("parameters") {
        Some(Value::Array(params)) => substitute(&message, |token| {
            token
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| params.get(i))
        }),
        Some(Value::Object(params)) => substitute(&message, |token| params.get(token)),
        _ => message,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// A usable message: non-empty, not null or false.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => (!s.is_empty()).then(|| s.clone()),
        other => Some(to_plain_string(other)),
    }
}

/// Replace every `%token` whose lookup succeeds; others are kept verbatim.
///
/// A token is the longest run of ASCII alphanumerics or `_` after `%`, so
/// `%10` never matches parameter 1.
fn substitute<'a, F>(message: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a Value>,
{
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let token = &after[..len];
        match lookup(token).filter(|_| !token.is_empty()) {
            Some(value) => out.push_str(&to_plain_string(value)),
            None => {
                out.push('%');
                out.push_str(token);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}
