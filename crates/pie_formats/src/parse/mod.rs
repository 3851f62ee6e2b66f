//! Source parsers turning raw bytes into [`Document`](crate::Document)s.

pub mod json;
pub mod toml;
pub mod yaml;
