//! Structured-document source formats for the pie cache.
//!
//! JSON, YAML and TOML sources all compile into the same [`Document`] value,
//! which is stored in cache bodies with `bincode`. [`DocumentFormat`] plugs
//! them into a [`CachingLoader`](pie_cache::CachingLoader).

#![warn(missing_docs)]

pub mod codec;
pub mod document;
pub mod error;
pub mod format;
pub mod parse;

pub use document::Document;
pub use error::FormatError;
pub use format::DocumentFormat;
