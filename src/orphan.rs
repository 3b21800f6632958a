//! Media files without a sidecar

use crate::sidecar::media_path_for;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Return every media path not implied by some sidecar, in input order.
///
/// Informational only; orphans never count as failures.
pub fn detect_orphans(sidecars: &[PathBuf], media: &[PathBuf]) -> Vec<PathBuf> {
    info!("Starting orphaned media file detection");

    let expected: HashSet<PathBuf> = sidecars
        .iter()
        .filter_map(|sidecar| media_path_for(sidecar).ok())
        .inspect(|path| debug!(?path, "Expected media file from metadata"))
        .collect();

    let orphans: Vec<PathBuf> = media
        .iter()
        .filter(|path| !expected.contains(path.as_path()))
        .cloned()
        .collect();

    if orphans.is_empty() {
        info!("No orphaned media files found - all media files have corresponding metadata");
    } else {
        info!(count = orphans.len(), "Found media files without corresponding metadata");
        for path in &orphans {
            warn!(path = %path.display(), "Media file without metadata");
        }
    }

    orphans
}
