//! YAML sources.
//!
//! Scalar mapping keys are stringified (`1: a` gets key `"1"`); sequence or
//! mapping keys are rejected. Tags are dropped in favour of the tagged value.

use serde_yaml::Value;

use crate::document::Document;
use crate::error::FormatError;

/// Parses a single-document YAML source. An empty source yields [`Document::Null`].
pub fn compile(src: &[u8]) -> Result<Document, FormatError> {
    let value: Value = serde_yaml::from_slice(src)?;
    from_value(value)
}

fn from_value(value: Value) -> Result<Document, FormatError> {
    Ok(match value {
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
        Value::Sequence(items) => Document::Sequence(
            items
                .into_iter()
                .map(from_value)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => Document::Mapping(
            map.into_iter()
                .map(|(k, v)| Ok((key_string(k)?, from_value(v)?)))
                .collect::<Result<_, FormatError>>()?,
        ),
        Value::Tagged(tagged) => from_value(tagged.value)?,
    })
}

fn key_string(key: Value) -> Result<String, FormatError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Tagged(tagged) => key_string(tagged.value),
        other => Err(FormatError::UnsupportedKey(
            serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_else(|_| format!("{other:?}")),
        )),
    }
}
