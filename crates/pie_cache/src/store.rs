//! Reading and atomically replacing cache files.

use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::CacheError;

/// Reads a whole cache file, returning `None` if it does not exist.
pub fn read(path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Replaces `path` with `contents`, creating missing parent directories.
///
/// The bytes are written to a temporary file in the target directory and
/// renamed over `path`, so a reader sees either the old file or the complete
/// new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), CacheError> {
    let io_err = |source: std::io::Error| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().ok_or_else(|| {
        io_err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "cache path has no parent directory",
        ))
    })?;
    std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Deletes a cache file. Returns `false` if there was nothing to delete.
pub fn remove(path: &Path) -> Result<bool, CacheError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
