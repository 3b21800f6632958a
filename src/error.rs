//! Error types for the timestamp updater
//!
//! Scan and configuration failures abort the run and are wrapped by [`Error`].
//! Root folder preconditions are reported as [`RootPathError`] before logging
//! starts.
//! Per-file errors are reported through [`FileError`] and never stop the batch.

use crate::config::ConfigError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fatal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for failures that abort the run
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The root folder failed one of the preconditions checked before processing
#[derive(Error, Debug)]
pub enum RootPathError {
    #[error("Path '{path}' does not exist")]
    NotFound { path: PathBuf },

    #[error("Path '{path}' is not a directory")]
    NotDirectory { path: PathBuf },

    #[error("No read access to directory '{path}': {source}")]
    NotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No write access to directory '{path}': {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory traversal failed; a partial tree view is never used
#[derive(Error, Debug)]
#[error("Error scanning directory '{root}': {source}")]
pub struct ScanError {
    pub root: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Failure to extract a capture time from a sidecar document
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Error reading metadata file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format in metadata file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing '{field}' field in metadata file '{path}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid '{field}' format (not {expected}) in metadata file '{path}'")]
    MalformedField {
        path: PathBuf,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Failed to convert timestamp '{value}' to integer in metadata file '{path}': {source}")]
    MalformedValue {
        path: PathBuf,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// A candidate timestamp fell outside the accepted range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Timestamp {timestamp} is before the minimum {min} (1990-01-01)")]
    BelowMinimum { timestamp: i64, min: i64 },

    #[error("Timestamp {timestamp} is too far in the future (maximum {max})")]
    AboveMaximum { timestamp: i64, max: i64 },
}

/// Failure to map a sidecar to an accessible media file
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid metadata file path '{path}' (must end with {suffix})")]
    InvalidSuffix { path: PathBuf, suffix: &'static str },

    #[error("Media file not found: {path}")]
    MediaNotFound { path: PathBuf },

    #[error("Media file not accessible: {path}: {reason}")]
    MediaNotAccessible { path: PathBuf, reason: String },
}

/// Failure to apply a timestamp to a media file
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Invalid timestamp for file '{path}': {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: TimestampError,
    },

    #[error("File not found when updating timestamps: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied when updating timestamps for file '{path}': {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OS error when updating timestamps for file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage at which a sidecar failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Parse,
    Resolve,
    Verify,
    Write,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Parse => "parse",
            FileStage::Resolve => "resolve",
            FileStage::Verify => "verify",
            FileStage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A recoverable failure for one sidecar, tagged with its stage
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Parse(MetadataError),

    #[error(transparent)]
    Resolve(ResolveError),

    #[error(transparent)]
    Verify(ResolveError),

    #[error(transparent)]
    Write(WriteError),
}

impl FileError {
    pub fn stage(&self) -> FileStage {
        match self {
            FileError::Parse(_) => FileStage::Parse,
            FileError::Resolve(_) => FileStage::Resolve,
            FileError::Verify(_) => FileStage::Verify,
            FileError::Write(_) => FileStage::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_stage() {
        let err = FileError::Verify(ResolveError::MediaNotFound {
            path: PathBuf::from("/photos/a.jpg"),
        });
        assert_eq!(err.stage(), FileStage::Verify);
        assert_eq!(err.to_string(), "Media file not found: /photos/a.jpg");
        assert_eq!(FileStage::Write.to_string(), "write");
    }

    #[test]
    fn test_config_error_is_fatal() {
        let err: Error = ConfigError::InvalidValue {
            field: "progress_interval",
            message: "must be at least 1".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("progress_interval"));
    }
}
