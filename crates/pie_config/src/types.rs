//! Configuration types deserialized from `pie.toml`.

use serde::Deserialize;

/// Name of the cache directory created next to each source file by default.
pub const DEFAULT_CACHE_DIR: &str = "__piecache__";

/// The top-level configuration parsed from `pie.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct PieConfig {
    /// Cache placement and validation settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Settings for where cache files live and how their headers are keyed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Directory name, relative to each source file's parent, holding caches.
    #[serde(default = "default_dir")]
    pub dir: String,
    /// First segment of the cache file suffix (`<source>.<tag>.pie`).
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Salt for source digests. Every run sharing a cache must agree on it.
    #[serde(default = "default_key")]
    pub key: String,
    /// When set, cache headers also record this version and go stale when it changes.
    #[serde(default)]
    pub tool_version: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            tag: default_tag(),
            key: default_key(),
            tool_version: None,
        }
    }
}

fn default_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

fn default_tag() -> String {
    format!("v{}", pie_common::FORMAT_VERSION)
}

fn default_key() -> String {
    String::from_utf8_lossy(pie_common::DIGEST_KEY).into_owned()
}
