//! Document data model for leafdb
//!
//! A document is a tree of [`Value`]s. Mappings and sequences are
//! containers; everything else is a leaf.
//!
//! # Design Principles
//!
//! - Mappings keep insertion order for display and serialization
//! - Mapping equality ignores order
//! - Integers and floats compare numerically with each other
//! - Sequences are addressed by decimal index strings
//!
//! Sub-documents can be embedded as [`Link`] values; see `node::link`.

mod errors;
mod link;
mod literal;
mod ops;

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use errors::{ValueError, ValueResult};
pub use link::Link;
pub use literal::{parse_literal, to_literal};
pub use ops::BinaryOp;

/// Ordered mapping used for document containers
pub type Map = IndexMap<String, Value>;

/// A single value inside a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Map(Map),
    /// Embedded sub-document
    Link(Link),
}

impl Default for Value {
    fn default() -> Self {
        Value::Map(Map::new())
    }
}

impl Value {
    /// An empty mapping, the contents of a fresh document
    pub fn empty() -> Self {
        Value::Map(Map::new())
    }

    /// Wrap raw bytes as an opaque leaf
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Link(_) => "link",
        }
    }

    /// Returns true for mappings and sequences
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Value::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Looks up an immediate child by key.
    ///
    /// Sequences accept decimal indices. Leaves have no children.
    pub fn child(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::List(items) => parse_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::child`]
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Map(map) => map.get_mut(key),
            Value::List(items) => parse_index(key).and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    /// Names of the immediate children in container order, or `None` for a leaf
    pub fn child_names(&self) -> Option<Vec<String>> {
        match self {
            Value::Map(map) => Some(map.keys().cloned().collect()),
            Value::List(items) => Some((0..items.len()).map(|i| i.to_string()).collect()),
            _ => None,
        }
    }

    /// Returns true if `key` names an immediate child
    pub fn has_child(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    /// Writes `value` under `key`, creating or overwriting it.
    ///
    /// A sequence index may address an existing element or be equal to the
    /// length, which appends.
    pub fn insert_child(&mut self, key: &str, value: Value) -> ValueResult<()> {
        match self {
            Value::Map(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Value::List(items) => {
                let len = items.len();
                match parse_index(key) {
                    Some(i) if i < len => {
                        items[i] = value;
                        Ok(())
                    }
                    Some(i) if i == len => {
                        items.push(value);
                        Ok(())
                    }
                    _ => Err(ValueError::IndexOutOfRange {
                        key: key.to_string(),
                        len,
                    }),
                }
            }
            other => Err(ValueError::NotAContainer {
                type_name: other.type_name(),
            }),
        }
    }

    /// Removes an immediate child, preserving the order of its siblings
    pub fn remove_child(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.shift_remove(key),
            Value::List(items) => match parse_index(key) {
                Some(i) if i < items.len() => Some(items.remove(i)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Walks a sequence of keys from this value
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |current, key| current.child(key.as_ref()))
    }
}

/// Parses a canonical list index: decimal digits with no sign or leading zero
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Link(a), Value::Link(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.partial_cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.partial_cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                a.len().partial_cmp(&b.len())
            }
            (Value::Map(_), Value::Map(_)) | (Value::Link(_), Value::Link(_)) => {
                if self == other {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_literal(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Link> for Value {
    fn from(link: Link) -> Self {
        Value::Link(link)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_equality_ignores_order() {
        let a: Value = vec![("x", 1), ("y", 2)].into_iter().collect();
        let b: Value = vec![("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_cross_equality_and_ordering() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::Float(3.0) > Value::Int(2));
        assert_eq!(Value::Str("a".into()).partial_cmp(&Value::Int(1)), None);
    }

    #[test]
    fn test_list_ordering_is_lexicographic() {
        assert!(Value::from(vec![1, 2]) < Value::from(vec![1, 3]));
        assert!(Value::from(vec![1, 2]) < Value::from(vec![1, 2, 0]));
    }

    #[test]
    fn test_child_access_on_map_and_list() {
        let doc = Value::from(json!({"a": [10, 20, {"b": true}]}));
        assert_eq!(doc.child("a").and_then(|a| a.child("1")), Some(&Value::Int(20)));
        assert_eq!(
            doc.get_path(&["a", "2", "b"]),
            Some(&Value::Bool(true))
        );
        assert!(doc.child("missing").is_none());
        assert!(Value::Int(1).child("x").is_none());
        assert!(doc.get_path(&["a", "-1"]).is_none());
    }

    #[test]
    fn test_list_index_must_be_canonical() {
        let list = Value::from(vec![10, 20]);
        assert!(list.has_child("0"));
        assert!(list.has_child("1"));
        assert!(!list.has_child("01"));
        assert!(!list.has_child("+1"));
        assert!(!list.has_child("00"));
    }

    #[test]
    fn test_child_names_in_container_order() {
        let mut map = Map::new();
        map.insert("z".into(), Value::Int(1));
        map.insert("a".into(), Value::Int(2));
        let ordered = Value::Map(map);
        assert_eq!(ordered.child_names(), Some(vec!["z".to_string(), "a".to_string()]));
        assert_eq!(Value::Null.child_names(), None);
    }

    #[test]
    fn test_insert_child_into_list() {
        let mut list = Value::from(vec![1, 2]);
        list.insert_child("0", Value::Int(9)).unwrap();
        list.insert_child("2", Value::Int(3)).unwrap();
        assert_eq!(list, Value::from(vec![9, 2, 3]));

        let err = list.insert_child("7", Value::Null).unwrap_err();
        assert!(matches!(err, ValueError::IndexOutOfRange { len: 3, .. }));
    }

    #[test]
    fn test_insert_child_into_leaf_fails() {
        let mut leaf = Value::Int(1);
        let err = leaf.insert_child("a", Value::Null).unwrap_err();
        assert_eq!(err, ValueError::NotAContainer { type_name: "int" });
    }

    #[test]
    fn test_remove_child_preserves_siblings() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Int(1));
        map.insert("b".into(), Value::Int(2));
        map.insert("c".into(), Value::Int(3));
        let mut doc = Value::Map(map);

        assert_eq!(doc.remove_child("b"), Some(Value::Int(2)));
        assert_eq!(doc.child_names(), Some(vec!["a".to_string(), "c".to_string()]));
        assert_eq!(doc.remove_child("b"), None);
    }

    #[test]
    fn test_from_json_value() {
        let doc = Value::from(json!({"n": 1, "f": 1.5, "s": "x", "l": [null, false]}));
        assert_eq!(doc.child("n"), Some(&Value::Int(1)));
        assert_eq!(doc.child("f"), Some(&Value::Float(1.5)));
        assert_eq!(doc.child("s"), Some(&Value::Str("x".into())));
        assert_eq!(
            doc.child("l"),
            Some(&Value::List(vec![Value::Null, Value::Bool(false)]))
        );
    }
}
