//! Google Photos sidecar files
//!
//! An export stores each media file's metadata next to it as
//! `<media-filename>.supplemental-metadata.json`. Pairing a sidecar with its
//! media file is purely path based: strip the suffix.

pub mod metadata;
pub mod resolve;

pub use metadata::{CaptureMetadata, parse_sidecar, parse_sidecar_bytes};
pub use resolve::{media_path_for, resolve_media_file, sidecar_path_for, verify_media_file};

use std::path::Path;

/// Fixed, case-sensitive name suffix of sidecar files
pub const SIDECAR_SUFFIX: &str = ".supplemental-metadata.json";

/// Check whether a path names a sidecar file.
///
/// Names that are not valid UTF-8 never match.
pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(SIDECAR_SUFFIX))
}
