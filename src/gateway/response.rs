//! Response-shape normalization.
//!
//! The backend is not uniform: some endpoints return the resource directly,
//! some wrap it in a `{success, data}` envelope, and error bodies come as a
//! `message`/`error`/`detail` field, a bare string, or a field-keyed
//! validation map. Everything funnels through here so the rest of the crate
//! sees exactly one contract.

use serde_json::{json, Map, Value};

/// Largest slice of a non-JSON body carried on an `InvalidResponse`.
pub(crate) const SNIPPET_CHARS: usize = 100;

/// Parses a response body read as text. An empty body parses to an empty
/// object; anything else must be valid JSON.
pub(crate) fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return Some(json!({}));
    }
    serde_json::from_str(text).ok()
}

pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

// Truthiness by the rules of the platform the backend was written against:
// false, 0, "" and null are falsy, everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Unwraps the `{success: true, data: T}` envelope when present; any other
/// body passes through verbatim. Both success shapes are accepted
/// transparently, so callers never see the envelope.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map)
            if map.get("success").map_or(false, is_truthy) && map.contains_key("data") =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Derives the human-readable message for a failed JSON request. Priority:
/// `message`, then `error`, then `detail`, then a bare-string body, then a
/// field-keyed validation map.
pub(crate) fn derive_message(body: &Value, status: u16) -> String {
    if let Some(field) = string_field(body, &["message", "error", "detail"]) {
        return field;
    }
    if let Value::String(s) = body {
        return s.clone();
    }
    if let Value::Object(map) = body {
        if let Some(joined) = validation_map_message(map) {
            return joined;
        }
    }
    fallback_message(status)
}

/// Message derivation for the multipart variants. Only `error` and `detail`
/// are consulted; `message` and the validation-map form are not. This
/// mirrors the upload path's historical behavior and must stay distinct from
/// [`derive_message`].
pub(crate) fn derive_message_form(body: &Value, status: u16) -> String {
    if let Some(field) = string_field(body, &["error", "detail"]) {
        return field;
    }
    fallback_message(status)
}

fn string_field(body: &Value, keys: &[&str]) -> Option<String> {
    let map = body.as_object()?;
    for key in keys {
        if let Some(Value::String(s)) = map.get(*key) {
            return Some(s.clone());
        }
    }
    None
}

// A validation map is an object whose every value is an array of strings,
// e.g. {"precio": ["required"], "marca": ["too short", "invalid"]}.
fn validation_map_message(map: &Map<String, Value>) -> Option<String> {
    if map.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(map.len());
    for (field, value) in map {
        let messages = value.as_array()?;
        let mut texts = Vec::with_capacity(messages.len());
        for message in messages {
            texts.push(message.as_str()?);
        }
        parts.push(format!("{}: {}", field, texts.join(", ")));
    }
    Some(parts.join("; "))
}

fn fallback_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}
