//! Error types for document formats.

use std::path::PathBuf;

/// Errors raised while compiling or (de)serializing a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The JSON source could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML source could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The TOML source could not be parsed.
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The source is not valid UTF-8.
    #[error("source is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A mapping key cannot be represented as a string.
    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),

    /// The source extension does not belong to any known format.
    #[error("no document format handles {0}")]
    UnknownExtension(PathBuf),

    /// A cache body could not be encoded or decoded.
    #[error("cache body codec error: {0}")]
    Codec(String),
}
