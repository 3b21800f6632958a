//! Recursive directory scan
//!
//! Every file below the root is classified as either a sidecar or a media
//! candidate. Symbolic links are skipped. No extension filtering is done: anything
//! that is not a sidecar is a media candidate.

use crate::config::Config;
use crate::error::ScanError;
use crate::process::CancellationToken;
use crate::sidecar::is_sidecar;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Files found under the root, each list in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub sidecars: Vec<PathBuf>,
    pub media: Vec<PathBuf>,
    /// The walk stopped early on cancellation; both lists are partial
    pub interrupted: bool,
}

/// Directory walker that partitions files into sidecars and media
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    exclude_dirs: Vec<PathBuf>,
    skip_files: Vec<PathBuf>,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            exclude_dirs: config.exclude_dirs.clone(),
            ..Self::default()
        }
    }

    /// Stop walking as soon as `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Leave one specific file out of the results (e.g. the run's own log file)
    pub fn skip_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.skip_files.push(path.into());
        self
    }

    /// Walk `root`. Any traversal error fails the whole scan.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        info!(root = %root.display(), "Starting recursive directory scan");

        let mut result = ScanResult::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(e));

        for entry in walker {
            if self.cancel.is_cancelled() {
                warn!(
                    metadata_files = result.sidecars.len(),
                    media_files = result.media.len(),
                    "Directory scan interrupted by user"
                );
                result.interrupted = true;
                return Ok(result);
            }

            let entry = entry.map_err(|e| ScanError {
                root: root.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                debug!(?path, "Scanning directory");
                continue;
            }
            // Links are never followed, so nothing outside the root is touched
            if entry.file_type().is_symlink() {
                debug!(?path, "Skipping symbolic link");
                continue;
            }
            if self.skip_files.iter().any(|skip| skip == path) {
                debug!(?path, "Skipping excluded file");
                continue;
            }

            if is_sidecar(path) {
                debug!(?path, "Found metadata file");
                result.sidecars.push(entry.into_path());
            } else {
                debug!(?path, "Found media file");
                result.media.push(entry.into_path());
            }
        }

        info!(
            metadata_files = result.sidecars.len(),
            media_files = result.media.len(),
            "Directory scan completed"
        );

        Ok(result)
    }

    /// Check if a directory should be pruned based on exclude_dirs
    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if self.exclude_dirs.is_empty() || entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let path = entry.path();
        for exclude in &self.exclude_dirs {
            if exclude.is_absolute() {
                if path.starts_with(exclude) {
                    debug!(?path, ?exclude, "Excluding directory (absolute path match)");
                    return true;
                }
            } else if let Some(Component::Normal(exclude_name)) = exclude.components().next_back()
                && entry.file_name() == exclude_name
            {
                debug!(?path, ?exclude, "Excluding directory (folder name match)");
                return true;
            }
        }

        false
    }
}

/// Scan `root` with default settings
pub fn scan_directory(root: &Path) -> Result<ScanResult, ScanError> {
    Scanner::new().scan(root)
}
