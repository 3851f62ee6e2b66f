//! Plugging document parsers into the caching loader.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pie_cache::{CachingLoader, Format};

use crate::document::Document;
use crate::error::FormatError;
use crate::{codec, parse};

const JSON_SUFFIXES: &[&str] = &[".json"];
const YAML_SUFFIXES: &[&str] = &[".yml", ".yaml"];
const TOML_SUFFIXES: &[&str] = &[".toml"];
const AUTO_SUFFIXES: &[&str] = &[".json", ".yml", ".yaml", ".toml"];

/// A document source format.
///
/// `Auto` accepts every known suffix and picks the parser from the extension
/// of the source that was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yml`, then `.yaml`
    Yaml,
    /// `.toml`
    Toml,
    /// Any of the above, in the order `.json`, `.yml`, `.yaml`, `.toml`.
    Auto,
}

impl DocumentFormat {
    /// Lowercase name of the format.
    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Toml => "toml",
            DocumentFormat::Auto => "auto",
        }
    }

    /// The concrete format owning a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(DocumentFormat::Json),
            "yml" | "yaml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    /// Builds a caching loader for `base` with this format's suffixes.
    pub fn loader(self, base: impl Into<PathBuf>) -> CachingLoader<Self> {
        CachingLoader::new(base, self)
    }

    fn resolve(self, path: &Path) -> Result<Self, FormatError> {
        if self != DocumentFormat::Auto {
            return Ok(self);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| FormatError::UnknownExtension(path.to_path_buf()))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DocumentFormat::Auto),
            other => Self::from_extension(other)
                .ok_or_else(|| format!("unknown format '{other}'")),
        }
    }
}

impl Format for DocumentFormat {
    type Program = Document;
    type Error = FormatError;

    fn suffixes(&self) -> &[&str] {
        match self {
            DocumentFormat::Json => JSON_SUFFIXES,
            DocumentFormat::Yaml => YAML_SUFFIXES,
            DocumentFormat::Toml => TOML_SUFFIXES,
            DocumentFormat::Auto => AUTO_SUFFIXES,
        }
    }

    fn compile(&self, src: &[u8], path: &Path) -> Result<Document, FormatError> {
        match self.resolve(path)? {
            DocumentFormat::Json => parse::json::compile(src),
            DocumentFormat::Yaml => parse::yaml::compile(src),
            DocumentFormat::Toml => parse::toml::compile(src),
            DocumentFormat::Auto => Err(FormatError::UnknownExtension(path.to_path_buf())),
        }
    }

    fn serialize(&self, program: &Document) -> Result<Vec<u8>, FormatError> {
        codec::encode(program)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document, FormatError> {
        codec::decode(bytes)
    }
}
