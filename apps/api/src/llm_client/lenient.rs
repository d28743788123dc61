//! Forgiving field adapters for JSON answers written by a model.
//!
//! Models are asked for a schema but answer in whatever shape is natural: `null`
//! for unknown values, `"85"` or `"85%"` for a score, a list where a sentence was
//! requested. Each adapter accepts those shapes instead of failing the request.
//! Use with `#[serde(default, deserialize_with = "...")]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A number, a numeric string (optionally ending in `%`), or anything else as `0`.
pub fn number<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from).unwrap_or(0.0))
}

/// A string, number or list rendered as text; `null` and blank text are `None`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from))
}

/// Like `opt_text`, with `null` as the empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text(deserializer).map(Option::unwrap_or_default)
}

/// A list of strings. A single string becomes a one-item list; `null` is empty.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(text_from).collect(),
        Some(other) => text_from(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Any `Default` type, with `null` treated like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn number_from(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| n as f32),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f32>().ok(),
        _ => None,
    }
}

fn text_from(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(text_from)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => value.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
