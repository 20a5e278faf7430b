//! Lenient decoding for loosely-typed upstream JSON.
//!
//! Upstream records are only trusted to be JSON objects. Individual fields
//! that carry an unexpected type decode to `None` instead of failing the
//! whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept strings and numbers, anything else becomes `None`.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Truthiness of an arbitrary JSON value.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

/// Pull the record array out of a response body.
///
/// Bodies are either a bare array or, when `wrapper` is given, an object
/// holding the array under that key.
pub fn extract_items(body: Value, wrapper: Option<&str>) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match wrapper.and_then(|key| obj.remove(key)) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decode up to `limit` records, skipping items that are not JSON objects.
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>, limit: usize) -> Vec<T> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .take(limit)
        .collect()
}

/// Truncate to at most `max` characters.
pub fn truncate_chars(text: Option<String>, max: usize) -> Option<String> {
    text.map(|s| match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    })
}
