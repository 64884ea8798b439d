//! JSON codec
//!
//! Keys are written sorted with two-space indentation so that diffs of a
//! saved document stay stable. Timestamps become RFC 3339 strings and bytes
//! become integer arrays; links and non-finite floats have no JSON form.

use chrono::SecondsFormat;
use serde_json::{Map as JsonMap, Number};

use super::errors::{CodecError, CodecResult};
use super::Format;
use crate::value::Value;

pub(super) fn encode(value: &Value) -> CodecResult<Vec<u8>> {
    let json = to_json(value)?;
    serde_json::to_vec_pretty(&json).map_err(|e| CodecError::encode(Format::Json, e))
}

pub(super) fn decode(data: &[u8]) -> CodecResult<Value> {
    let json: serde_json::Value =
        serde_json::from_slice(data).map_err(|e| CodecError::decode(Format::Json, e))?;
    Ok(Value::from(json))
}

fn to_json(value: &Value) -> CodecResult<serde_json::Value> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| CodecError::encode(Format::Json, format!("{} is not finite", f)))?,
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => serde_json::Value::Array(
            bytes
                .iter()
                .map(|b| serde_json::Value::Number((*b).into()))
                .collect(),
        ),
        Value::Timestamp(t) => {
            serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<CodecResult<_>>()?)
        }
        Value::Map(map) => {
            // serde_json's default map is ordered by key
            let mut obj = JsonMap::new();
            for (key, item) in map {
                obj.insert(key.clone(), to_json(item)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Link(_) => {
            return Err(CodecError::encode(
                Format::Json,
                "linked sub-documents have no JSON form",
            ))
        }
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Link, Map};

    #[test]
    fn test_keys_sorted_and_indented() {
        let mut map = Map::new();
        map.insert("b".into(), Value::Int(1));
        map.insert("a".into(), Value::Int(2));
        let text = String::from_utf8(encode(&Value::Map(map)).unwrap()).unwrap();
        assert_eq!(text, "{\n  \"a\": 2,\n  \"b\": 1\n}");
    }

    #[test]
    fn test_bytes_become_integer_arrays() {
        let text = String::from_utf8(encode(&Value::bytes(vec![1u8, 255])).unwrap()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!([1, 255]));
    }

    #[test]
    fn test_unrepresentable_values_fail_to_encode() {
        assert!(encode(&Value::Float(f64::NAN)).is_err());
        let link = Value::Link(Link::to_file("x.pyn", Format::Structured));
        let err = encode(&Value::List(vec![link])).unwrap_err();
        assert!(!err.is_decode());
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        assert!(decode(b"{'a': 1}").unwrap_err().is_decode());
    }
}
