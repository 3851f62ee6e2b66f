//! Error types for cache operations.

use std::path::PathBuf;

/// Errors surfaced at the [`CachingLoader`](crate::CachingLoader) boundary.
///
/// Nothing here is retried or downgraded to a cache miss: a corrupt cache
/// file is reported rather than silently recompiled.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// None of the candidate source files exist.
    #[error("source not found, searched any of:{}", format_searched(.searched))]
    NotFound {
        /// Absolute paths that were probed, in suffix order.
        searched: Vec<PathBuf>,
    },

    /// An existing cache file does not hold a valid header frame or body.
    #[error("malformed cache file {path}: {reason}")]
    MalformedCache {
        /// The cache file path.
        path: PathBuf,
        /// Description of what failed to parse.
        reason: String,
    },

    /// The format rejected the source file.
    #[error("failed to compile {path}: {source}")]
    Compile {
        /// The source file that failed to compile.
        path: PathBuf,
        /// The format-specific error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A compiled program could not be encoded for the cache body.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// An I/O error occurred while reading or writing a source or cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| format!("\n- {}", p.display()))
        .collect()
}
