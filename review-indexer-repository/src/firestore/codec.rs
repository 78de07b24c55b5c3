//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! The REST API wraps every field in a single-key object naming its type
//! (`{"stringValue": "r1"}`, `{"doubleValue": 5.0}`, `{"mapValue": {"fields": ...}}`).
//! Documents are serialized to `serde_json::Value` first and then wrapped, and
//! responses are unwrapped back to plain JSON before typed decoding.

use serde::Serialize;
use serde_json::{json, Map, Number, Value};

use crate::errors::ReviewStoreError;

/// Encode a serializable document into a Firestore `fields` map.
///
/// The document must serialize to a JSON object.
pub fn encode_document<T: Serialize>(document: &T) -> Result<Map<String, Value>, ReviewStoreError> {
    match serde_json::to_value(document)
        .map_err(|e| ReviewStoreError::serialization(e.to_string()))?
    {
        Value::Object(fields) => Ok(encode_fields(&fields)),
        _ => Err(ReviewStoreError::serialization(
            "document must serialize to a JSON object",
        )),
    }
}

/// Wrap every entry of a plain JSON object as a Firestore value.
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Wrap one plain JSON value as a Firestore value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => encode_number(n),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

fn encode_number(n: &Number) -> Value {
    // integerValue is a decimal string in the REST encoding
    if let Some(i) = n.as_i64() {
        json!({ "integerValue": i.to_string() })
    } else {
        json!({ "doubleValue": n.as_f64().unwrap_or(0.0) })
    }
}

/// Unwrap a Firestore `fields` map into a plain JSON object.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Value, ReviewStoreError> {
    let mut decoded = Map::with_capacity(fields.len());
    for (key, value) in fields {
        decoded.insert(key.clone(), decode_value(value)?);
    }
    Ok(Value::Object(decoded))
}

/// Unwrap one Firestore value into plain JSON.
///
/// Timestamps, bytes and references come back as strings. Non-finite doubles,
/// which JSON cannot carry, come back as null.
pub fn decode_value(value: &Value) -> Result<Value, ReviewStoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| ReviewStoreError::parse(format!("expected a typed value, got {}", value)))?;

    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| ReviewStoreError::parse("empty typed value"))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(Value::Bool(inner.as_bool().unwrap_or(false))),
        "integerValue" => decode_integer(inner),
        "doubleValue" => Ok(decode_double(inner)),
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => {
            Ok(Value::String(inner.as_str().unwrap_or_default().to_string()))
        }
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(ReviewStoreError::parse(format!(
            "unsupported Firestore value type '{}'",
            other
        ))),
    }
}

fn decode_integer(inner: &Value) -> Result<Value, ReviewStoreError> {
    let parsed = match inner {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed
        .map(|i| Value::Number(i.into()))
        .ok_or_else(|| ReviewStoreError::parse(format!("invalid integerValue {}", inner)))
}

fn decode_double(inner: &Value) -> Value {
    match inner {
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
