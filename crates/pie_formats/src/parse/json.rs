//! JSON sources.

use serde_json::Value;

use crate::document::Document;
use crate::error::FormatError;

/// Parses a JSON source.
pub fn compile(src: &[u8]) -> Result<Document, FormatError> {
    let value: Value = serde_json::from_slice(src)?;
    Ok(from_value(value))
}

fn from_value(value: Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Document::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Document::Unsigned(u)
            } else {
                Document::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Document::String(s),
        Value::Array(items) => Document::Sequence(items.into_iter().map(from_value).collect()),
        Value::Object(map) => Document::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, from_value(v)))
                .collect(),
        ),
    }
}
