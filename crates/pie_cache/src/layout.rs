//! Derivation of cache file locations from source paths.
//!
//! A source `<dir>/<name>` is cached at `<dir>/<cache dir>/<name>.<tag>.pie`.
//! The source extension stays in the cache name so `conf.yml` and `conf.yaml`
//! never share an entry, and the `.<tag>.pie` suffix keeps this cache family
//! apart from anything else stored in the same directory. Header strategies
//! with their own family extend the tag, giving `<name>.<tag>-<family>.pie`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// Default name of the cache directory created next to source files.
pub const DEFAULT_CACHE_DIR: &str = "__piecache__";

/// Final extension of every cache file.
pub const CACHE_EXT: &str = "pie";

/// Where cache files live relative to their sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    dir_name: String,
    tag: String,
}

impl CacheLayout {
    /// Creates a layout with a custom directory name and suffix tag.
    pub fn new(dir_name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
            tag: tag.into(),
        }
    }

    /// The cache directory name.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// The first segment of the cache file suffix.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the absolute cache file path for `source`.
    ///
    /// Pure path arithmetic: nothing is created or checked on disk.
    pub fn cache_path(&self, source: &Path) -> Result<PathBuf, CacheError> {
        self.family_cache_path(source, None)
    }

    /// Like [`cache_path`](Self::cache_path), with `family` appended to the tag.
    pub fn family_cache_path(
        &self,
        source: &Path,
        family: Option<&str>,
    ) -> Result<PathBuf, CacheError> {
        let source = absolute(source)?;
        let (Some(parent), Some(file_name)) = (source.parent(), source.file_name()) else {
            return Err(CacheError::Io {
                path: source.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "source path has no file name",
                ),
            });
        };

        let mut name = OsString::from(file_name);
        name.push(".");
        name.push(&self.tag);
        if let Some(family) = family {
            name.push("-");
            name.push(family);
        }
        name.push(".");
        name.push(CACHE_EXT);
        Ok(parent.join(&self.dir_name).join(name))
    }
}

impl Default for CacheLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR, format!("v{}", pie_common::FORMAT_VERSION))
    }
}

/// Makes `path` absolute against the working directory without resolving symlinks.
pub fn absolute(path: &Path) -> Result<PathBuf, CacheError> {
    std::path::absolute(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Appends `suffix` to `base`, e.g. `conf` + `.yml` gives `conf.yml`.
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}
