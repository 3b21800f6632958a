//! Root folder checks performed before any processing

use crate::error::RootPathError;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Verify the root exists, is a directory, is readable and is writable.
///
/// Writability is proven by creating and removing a temporary file inside it.
pub fn validate_root(path: &Path) -> Result<(), RootPathError> {
    if !path.exists() {
        return Err(RootPathError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        return Err(RootPathError::NotDirectory {
            path: path.to_path_buf(),
        });
    }

    fs::read_dir(path).map_err(|e| RootPathError::NotReadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    let probe = NamedTempFile::new_in(path).map_err(|e| RootPathError::NotWritable {
        path: path.to_path_buf(),
        source: e,
    })?;
    probe.close().map_err(|e| RootPathError::NotWritable {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
