//! TOML sources. Datetimes are kept as their RFC 3339 text.

use ::toml::{Table, Value};

use crate::document::Document;
use crate::error::FormatError;

/// Parses a TOML document.
pub fn compile(src: &[u8]) -> Result<Document, FormatError> {
    let text = std::str::from_utf8(src)?;
    let table: Table = ::toml::from_str(text)?;
    Ok(from_value(Value::Table(table)))
}

fn from_value(value: Value) -> Document {
    match value {
        Value::String(s) => Document::String(s),
        Value::Integer(i) => Document::Integer(i),
        Value::Float(f) => Document::Float(f),
        Value::Boolean(b) => Document::Bool(b),
        Value::Datetime(dt) => Document::String(dt.to_string()),
        Value::Array(items) => Document::Sequence(items.into_iter().map(from_value).collect()),
        Value::Table(table) => Document::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (k, from_value(v)))
                .collect(),
        ),
    }
}
