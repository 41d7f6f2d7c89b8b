// src/stores/value.rs

//! Codec between plain JSON and the document store wire format, which tags
//! every value with its type:
//!
//! `{"stringValue": "x"}`, `{"integerValue": "42"}`, `{"doubleValue": 1.5}`,
//! `{"booleanValue": true}`, `{"timestampValue": "..."}`, `{"nullValue": null}`,
//! `{"arrayValue": {"values": [...]}}`, `{"mapValue": {"fields": {...}}}`.
//!
//! Integers ride as strings on the wire (64-bit values exceed what JSON
//! numbers guarantee); the decoder parses them back to numbers when possible.

use serde_json::{json, Map, Value};

/// Encodes a plain JSON value into its tagged wire form.
pub fn to_value(value: &Value) -> Value {
  match value {
    Value::Null => json!({ "nullValue": null }),
    Value::Bool(b) => json!({ "booleanValue": b }),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        json!({ "integerValue": i.to_string() })
      } else {
        json!({ "doubleValue": n.as_f64() })
      }
    }
    Value::String(s) => json!({ "stringValue": s }),
    Value::Array(items) => {
      let values: Vec<Value> = items.iter().map(to_value).collect();
      json!({ "arrayValue": { "values": values } })
    }
    Value::Object(map) => json!({ "mapValue": { "fields": to_fields(map) } }),
  }
}

/// Decodes a tagged wire value back to plain JSON. Timestamps come back as
/// RFC 3339 strings; unrecognized tags decode to null.
pub fn from_value(value: &Value) -> Value {
  let Some(map) = value.as_object() else {
    return Value::Null;
  };

  if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
    return Value::from(s);
  }
  if let Some(raw) = map.get("integerValue") {
    // The wire encodes integers as strings, but be lenient about numbers.
    if let Some(s) = raw.as_str() {
      if let Ok(i) = s.parse::<i64>() {
        return Value::from(i);
      }
      return Value::from(s);
    }
    return raw.clone();
  }
  if let Some(d) = map.get("doubleValue") {
    return d.clone();
  }
  if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
    return Value::from(b);
  }
  if let Some(ts) = map.get("timestampValue").and_then(Value::as_str) {
    return Value::from(ts);
  }
  if map.contains_key("nullValue") {
    return Value::Null;
  }
  if let Some(arr) = map.get("arrayValue") {
    let items = arr
      .get("values")
      .and_then(Value::as_array)
      .map(|values| values.iter().map(from_value).collect())
      .unwrap_or_default();
    return Value::Array(items);
  }
  if let Some(inner) = map.get("mapValue") {
    let fields = inner
      .get("fields")
      .and_then(Value::as_object)
      .map(from_fields)
      .unwrap_or_default();
    return Value::Object(fields);
  }
  if let Some(r) = map.get("referenceValue").and_then(Value::as_str) {
    return Value::from(r);
  }

  Value::Null
}

pub fn to_fields(map: &Map<String, Value>) -> Map<String, Value> {
  map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()
}

pub fn from_fields(map: &Map<String, Value>) -> Map<String, Value> {
  map.iter().map(|(k, v)| (k.clone(), from_value(v))).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encodes_scalars() {
    assert_eq!(to_value(&json!("jar")), json!({"stringValue": "jar"}));
    assert_eq!(to_value(&json!(42)), json!({"integerValue": "42"}));
    assert_eq!(to_value(&json!(1.5)), json!({"doubleValue": 1.5}));
    assert_eq!(to_value(&json!(true)), json!({"booleanValue": true}));
    assert_eq!(to_value(&Value::Null), json!({"nullValue": null}));
  }

  #[test]
  fn round_trips_nested_structures() {
    let original = json!({
      "productName": "Atlas Blender",
      "price": 199.99,
      "stock": 5,
      "emi": false,
      "images": ["a.jpg", "b.jpg"],
      "dimensions": { "heightCm": 40, "note": null },
    });
    let encoded = to_value(&original);
    assert_eq!(from_value(&encoded), original);
  }

  #[test]
  fn decodes_timestamp_to_string() {
    let wire = json!({"timestampValue": "2025-02-01T00:00:00Z"});
    assert_eq!(from_value(&wire), json!("2025-02-01T00:00:00Z"));
  }

  #[test]
  fn decodes_unparseable_integer_as_string() {
    let wire = json!({"integerValue": "not-a-number"});
    assert_eq!(from_value(&wire), json!("not-a-number"));
  }

  #[test]
  fn unknown_tag_decodes_to_null() {
    let wire = json!({"geoPointValue": {"latitude": 1.0, "longitude": 2.0}});
    assert_eq!(from_value(&wire), Value::Null);
  }

  #[test]
  fn empty_array_round_trips() {
    let encoded = to_value(&json!([]));
    assert_eq!(from_value(&encoded), json!([]));
  }
}
