//! Translation between plain JSON and the Firestore REST typed-value format.
//!
//! The REST API wraps every field in a type discriminator
//! (`{"stringValue": "x"}`, `{"integerValue": "3"}`, ...). The rest of the
//! crate works on plain `serde_json::Value`, so encoding/decoding is confined
//! to this module.

use serde_json::{json, Map, Value};

/// Encodes a plain JSON object into a Firestore `fields` map.
///
/// Non-object input yields an empty map; merge-writes always carry objects.
pub fn encode_fields(data: &Value) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            fields.insert(key.clone(), encode_value(value));
        }
    }
    fields
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // integerValue is a decimal string on the wire
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(_) => {
            json!({ "mapValue": { "fields": Value::Object(encode_fields(value)) } })
        }
    }
}

/// Decodes a Firestore `fields` map back into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Value {
    let mut out = Map::new();
    if let Value::Object(map) = fields {
        for (key, wrapped) in map {
            out.insert(key.clone(), decode_value(wrapped));
        }
    }
    Value::Object(out)
}

pub fn decode_value(wrapped: &Value) -> Value {
    let Value::Object(map) = wrapped else {
        return Value::Null;
    };

    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = map.get("timestampValue").and_then(Value::as_str) {
        // Timestamps come back as RFC 3339 strings; keep them as strings.
        return Value::String(s.to_string());
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(raw) = map.get("integerValue") {
        let parsed = match raw {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(i) = parsed {
            return json!(i);
        }
    }
    if let Some(d) = map.get("doubleValue").and_then(Value::as_f64) {
        return json!(d);
    }
    if map.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(array) = map.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(items);
    }
    if let Some(inner) = map.get("mapValue") {
        return decode_fields(inner.get("fields").unwrap_or(&Value::Null));
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        let data = json!({
            "title": "Portfolio",
            "order": 3,
            "level": 87.5,
            "live": true,
            "image": null
        });

        let fields = encode_fields(&data);

        assert_eq!(fields["title"], json!({ "stringValue": "Portfolio" }));
        assert_eq!(fields["order"], json!({ "integerValue": "3" }));
        assert_eq!(fields["level"], json!({ "doubleValue": 87.5 }));
        assert_eq!(fields["live"], json!({ "booleanValue": true }));
        assert_eq!(fields["image"], json!({ "nullValue": null }));
    }

    #[test]
    fn test_round_trip_nested_document() {
        let data = json!({
            "name": "Jane Doe",
            "techStack": ["Rust", "Tokio"],
            "links": { "github": "https://example.com", "order": 2 }
        });

        let fields = Value::Object(encode_fields(&data));
        let decoded = decode_fields(&fields);

        assert_eq!(decoded, data);
    }

    #[test]
    fn test_decode_timestamp_as_string() {
        let wrapped = json!({ "timestampValue": "2026-08-30T10:00:00Z" });
        assert_eq!(decode_value(&wrapped), json!("2026-08-30T10:00:00Z"));
    }

    #[test]
    fn test_decode_integer_string_form() {
        let wrapped = json!({ "integerValue": "999" });
        assert_eq!(decode_value(&wrapped), json!(999));
    }

    #[test]
    fn test_decode_unknown_shape_is_null() {
        assert_eq!(decode_value(&json!("bare")), Value::Null);
        assert_eq!(decode_value(&json!({ "weirdValue": 1 })), Value::Null);
    }

    #[test]
    fn test_empty_array_round_trip() {
        let data = json!({ "taglines": [] });
        let decoded = decode_fields(&Value::Object(encode_fields(&data)));
        assert_eq!(decoded, data);
    }
}
