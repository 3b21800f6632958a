//! Capture time extraction from sidecar JSON
//!
//! Required shape:
//!
//! ```json
//! { "photoTakenTime": { "timestamp": "1571673729" } }
//! ```
//!
//! Every missing or mistyped field is a distinct error. Nothing is guessed.

use crate::error::MetadataError;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

const PHOTO_TAKEN_TIME: &str = "photoTakenTime";
const TIMESTAMP: &str = "timestamp";

/// Metadata read from one sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// `photoTakenTime.timestamp`, Unix seconds (not yet range-checked)
    pub photo_taken_time: i64,
    /// Original file title, if present
    pub title: Option<String>,
}

/// Read and parse a sidecar file
pub fn parse_sidecar(path: &Path) -> Result<CaptureMetadata, MetadataError> {
    debug!(?path, "Parsing metadata file");

    let bytes = fs::read(path).map_err(|e| MetadataError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let metadata = parse_sidecar_bytes(&bytes, path)?;
    debug!(
        ?path,
        timestamp = metadata.photo_taken_time,
        title = metadata.title.as_deref(),
        "Extracted timestamp"
    );
    Ok(metadata)
}

/// Parse sidecar content; `path` is only used for error context
pub fn parse_sidecar_bytes(bytes: &[u8], path: &Path) -> Result<CaptureMetadata, MetadataError> {
    let document: Value = serde_json::from_slice(bytes).map_err(|e| MetadataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let photo_taken_time = document
        .get(PHOTO_TAKEN_TIME)
        .ok_or_else(|| MetadataError::MissingField {
            path: path.to_path_buf(),
            field: PHOTO_TAKEN_TIME,
        })?;

    let photo_taken_time = photo_taken_time
        .as_object()
        .ok_or_else(|| MetadataError::MalformedField {
            path: path.to_path_buf(),
            field: PHOTO_TAKEN_TIME,
            expected: "an object",
        })?;

    let timestamp = photo_taken_time
        .get(TIMESTAMP)
        .ok_or_else(|| MetadataError::MissingField {
            path: path.to_path_buf(),
            field: TIMESTAMP,
        })?;

    let timestamp = timestamp
        .as_str()
        .ok_or_else(|| MetadataError::MalformedField {
            path: path.to_path_buf(),
            field: TIMESTAMP,
            expected: "a string",
        })?;

    let photo_taken_time = timestamp
        .trim()
        .parse::<i64>()
        .map_err(|e| MetadataError::MalformedValue {
            path: path.to_path_buf(),
            value: timestamp.to_string(),
            source: e,
        })?;

    let title = document
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(CaptureMetadata {
        photo_taken_time,
        title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(json: &str) -> Result<CaptureMetadata, MetadataError> {
        parse_sidecar_bytes(json.as_bytes(), Path::new("a.jpg.supplemental-metadata.json"))
    }

    #[test]
    fn test_valid_document() {
        let meta = parse(
            r#"{
                "title": "IMG_0001.jpg",
                "creationTime": { "timestamp": "1571700000", "formatted": "Oct 21, 2019" },
                "photoTakenTime": { "timestamp": "1571673729", "formatted": "Oct 21, 2019" }
            }"#,
        )
        .unwrap();
        assert_eq!(meta.photo_taken_time, 1571673729);
        assert_eq!(meta.title.as_deref(), Some("IMG_0001.jpg"));
    }

    #[test]
    fn test_title_is_optional() {
        let meta = parse(r#"{"photoTakenTime": {"timestamp": "1571673729"}}"#).unwrap();
        assert_eq!(meta.photo_taken_time, 1571673729);
        assert!(meta.title.is_none());
    }

    #[test]
    fn test_negative_value_parses() {
        // Range checking happens later
        let meta = parse(r#"{"photoTakenTime": {"timestamp": "-5"}}"#).unwrap();
        assert_eq!(meta.photo_taken_time, -5);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse("{ invalid json content"),
            Err(MetadataError::Parse { .. })
        ));
        assert!(matches!(parse(""), Err(MetadataError::Parse { .. })));
    }

    #[test]
    fn test_missing_photo_taken_time() {
        let err = parse(r#"{"title": "test.jpg", "creationTime": {"timestamp": "1571673729"}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            MetadataError::MissingField { field: "photoTakenTime", .. }
        ));
    }

    #[test]
    fn test_non_object_document() {
        assert!(matches!(
            parse("[1, 2, 3]"),
            Err(MetadataError::MissingField { field: "photoTakenTime", .. })
        ));
    }

    #[test]
    fn test_photo_taken_time_not_object() {
        assert!(matches!(
            parse(r#"{"photoTakenTime": "1571673729"}"#),
            Err(MetadataError::MalformedField { field: "photoTakenTime", .. })
        ));
    }

    #[test]
    fn test_missing_timestamp() {
        assert!(matches!(
            parse(r#"{"photoTakenTime": {"formatted": "Oct 21, 2019"}}"#),
            Err(MetadataError::MissingField { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_timestamp_not_string() {
        assert!(matches!(
            parse(r#"{"photoTakenTime": {"timestamp": 1571673729}}"#),
            Err(MetadataError::MalformedField { field: "timestamp", .. })
        ));
        assert!(matches!(
            parse(r#"{"photoTakenTime": {"timestamp": null}}"#),
            Err(MetadataError::MalformedField { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_timestamp_not_numeric() {
        let err = parse(r#"{"photoTakenTime": {"timestamp": "yesterday"}}"#).unwrap_err();
        match err {
            MetadataError::MalformedValue { value, .. } => assert_eq!(value, "yesterday"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            parse(r#"{"photoTakenTime": {"timestamp": "1571673729.5"}}"#),
            Err(MetadataError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.jpg.supplemental-metadata.json");
        fs::write(&path, r#"{"photoTakenTime": {"timestamp": "1571673729"}}"#).unwrap();

        assert_eq!(parse_sidecar(&path).unwrap().photo_taken_time, 1571673729);
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.supplemental-metadata.json");

        assert!(matches!(
            parse_sidecar(&path),
            Err(MetadataError::Read { .. })
        ));
    }
}
