//! Binary encoding of [`Document`]s for cache bodies.

use crate::document::Document;
use crate::error::FormatError;

/// Encodes a document with bincode's standard configuration.
pub fn encode(doc: &Document) -> Result<Vec<u8>, FormatError> {
    bincode::serde::encode_to_vec(doc, bincode::config::standard())
        .map_err(|e| FormatError::Codec(e.to_string()))
}

/// Decodes a document, rejecting trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<Document, FormatError> {
    let (doc, read): (Document, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| FormatError::Codec(e.to_string()))?;
    if read != bytes.len() {
        return Err(FormatError::Codec(format!(
            "{} trailing bytes after document",
            bytes.len() - read
        )));
    }
    Ok(doc)
}
