//! The compiled program type shared by every document format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parsed structured document.
///
/// Mapping keys are always strings and kept sorted, so the same logical
/// document compiles to the same value no matter which format it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Document {
    /// An explicit null / empty value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large for `i64`.
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list.
    Sequence(Vec<Document>),
    /// A string-keyed map.
    Mapping(BTreeMap<String, Document>),
}

impl Document {
    /// Looks up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Document::Integer(n) => Some(n),
            Document::Unsigned(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Converts to a JSON value for display. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Integer(n) => Value::from(*n),
            Document::Unsigned(n) => Value::from(*n),
            Document::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Document::String(s) => Value::String(s.clone()),
            Document::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Document::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}
