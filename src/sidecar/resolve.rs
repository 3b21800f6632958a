//! Sidecar to media file path resolution

use super::SIDECAR_SUFFIX;
use crate::error::ResolveError;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Compute the media path implied by a sidecar path by stripping the suffix.
///
/// No filesystem access.
pub fn media_path_for(sidecar: &Path) -> Result<PathBuf, ResolveError> {
    let invalid = || ResolveError::InvalidSuffix {
        path: sidecar.to_path_buf(),
        suffix: SIDECAR_SUFFIX,
    };

    let name = sidecar.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let media_name = name.strip_suffix(SIDECAR_SUFFIX).ok_or_else(invalid)?;

    let parent = sidecar.parent().unwrap_or(Path::new(""));
    Ok(parent.join(media_name))
}

/// Inverse of [`media_path_for`]
pub fn sidecar_path_for(media: &Path) -> PathBuf {
    let mut path = media.as_os_str().to_os_string();
    path.push(SIDECAR_SUFFIX);
    PathBuf::from(path)
}

/// Check that a media path exists, is a regular file (not a link) and can be
/// opened for reading
pub fn verify_media_file(path: &Path) -> Result<(), ResolveError> {
    debug!(?path, "Verifying media file exists");

    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(?path, "Media file does not exist");
            return Err(ResolveError::MediaNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            warn!(?path, error = %e, "Error verifying media file");
            return Err(ResolveError::MediaNotAccessible {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    if metadata.file_type().is_symlink() {
        warn!(?path, "Media path is a symbolic link");
        return Err(ResolveError::MediaNotAccessible {
            path: path.to_path_buf(),
            reason: "symbolic links are not followed".into(),
        });
    }

    if !metadata.is_file() {
        warn!(?path, "Media path is not a file");
        return Err(ResolveError::MediaNotAccessible {
            path: path.to_path_buf(),
            reason: "not a regular file".into(),
        });
    }

    File::open(path).map_err(|e| {
        warn!(?path, error = %e, "No read access to media file");
        ResolveError::MediaNotAccessible {
            path: path.to_path_buf(),
            reason: format!("no read access: {}", e),
        }
    })?;

    Ok(())
}

/// Resolve a sidecar to its media file and verify the file is usable
pub fn resolve_media_file(sidecar: &Path) -> Result<PathBuf, ResolveError> {
    let media = media_path_for(sidecar)?;
    debug!(?sidecar, ?media, "Resolved media file path");
    verify_media_file(&media)?;
    Ok(media)
}
