//! Helpers for decoding model replies into typed contracts.

use algoviz_core::strip_code_fence;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

/// Decodes a model reply (optionally fenced) into `T`.
///
/// `contract` names the expected shape in error messages.
pub fn decode_reply<T: DeserializeOwned>(raw: &str, contract: &str) -> Result<T, ApiError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body).map_err(|err| {
        ApiError::UpstreamFailure(format!("{} reply was not valid JSON: {}", contract, err))
    })?;
    serde_json::from_value(value).map_err(|err| {
        ApiError::UpstreamFailure(format!(
            "{} reply did not match contract schema: {}",
            contract, err
        ))
    })
}

/// Accepts a string, a list of strings (joined by newlines) or any other
/// JSON value (rendered as JSON text). Models are inconsistent here.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

/// Renders a JSON value as display text; strings are unquoted.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
