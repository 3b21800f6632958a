//! Apply capture times to media files
//!
//! Only the access and modification times change. Content, ownership and
//! permission bits are left alone.

use crate::error::WriteError;
use crate::time::{TimestampValidator, ValidatedTimestamp};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Validate `timestamp` and set both atime and mtime of `path` to it.
///
/// The range check is repeated here so the writer is safe to call on its own.
pub fn apply_timestamp(
    path: &Path,
    timestamp: i64,
    validator: &TimestampValidator,
) -> Result<ValidatedTimestamp, WriteError> {
    debug!(?path, timestamp, "Updating timestamps for file");

    let validated = validator
        .validate(timestamp)
        .map_err(|e| WriteError::Validation {
            path: path.to_path_buf(),
            source: e,
        })?;

    let file_time = validated.to_file_time();
    filetime::set_file_times(path, file_time, file_time).map_err(|e| match e.kind() {
        ErrorKind::NotFound => WriteError::NotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => WriteError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        },
        _ => WriteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    info!(
        path = %path.display(),
        time = %validated.to_local_string(),
        "Updated timestamps"
    );

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimestampError;
    use crate::time::FixedClock;
    use filetime::FileTime;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn validator() -> TimestampValidator {
        TimestampValidator::new(Arc::new(FixedClock::new(1_718_452_800)))
    }

    #[test]
    fn test_sets_access_and_modification_time() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.jpg");
        fs::write(&path, b"fake image content").unwrap();

        let applied = apply_timestamp(&path, 1571673729, &validator()).unwrap();
        assert_eq!(applied.seconds(), 1571673729);

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&metadata).unix_seconds(),
            1571673729
        );
        assert_eq!(
            FileTime::from_last_access_time(&metadata).unix_seconds(),
            1571673729
        );
    }

    #[test]
    fn test_content_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.jpg");
        fs::write(&path, b"fake image content").unwrap();

        apply_timestamp(&path, 1571673729, &validator()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"fake image content");
    }

    #[test]
    fn test_invalid_timestamp_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.jpg");
        fs::write(&path, b"x").unwrap();
        let before = FileTime::from_last_modification_time(&fs::metadata(&path).unwrap());

        let err = apply_timestamp(&path, -1, &validator()).unwrap_err();
        assert!(matches!(
            err,
            WriteError::Validation {
                source: TimestampError::BelowMinimum { .. },
                ..
            }
        ));

        let after = FileTime::from_last_modification_time(&fs::metadata(&path).unwrap());
        assert_eq!(before, after);
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let path = locked.join("test.jpg");
        fs::write(&path, b"x").unwrap();
        // No search permission on the parent makes the file unreachable
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o600)).unwrap();

        // Permission bits are not enforced for root
        if fs::metadata(&path).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let outcome = apply_timestamp(&path, 1571673729, &validator());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(outcome, Err(WriteError::PermissionDenied { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.jpg");

        assert!(matches!(
            apply_timestamp(&path, 1571673729, &validator()),
            Err(WriteError::NotFound { .. })
        ));
    }
}
