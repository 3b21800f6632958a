//! Photo Timestamp Updater - restore capture times on Google Photos exports
//!
//! An export ships every photo or video with a
//! `<name>.supplemental-metadata.json` sidecar recording when it was taken,
//! while the media files themselves carry the export time. This library:
//! - Scans an export folder and pairs sidecars with media files by path
//! - Parses and range-checks `photoTakenTime.timestamp`
//! - Reports media files that have no sidecar
//! - Sets each media file's access and modification times, one file at a
//!   time, recording failures without stopping the batch

pub mod cli;
pub mod config;
pub mod error;
pub mod orphan;
pub mod preflight;
pub mod process;
pub mod report;
pub mod scan;
pub mod sidecar;
pub mod time;
pub mod writer;

pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use error::{Error, FileError, FileStage, Result};
pub use orphan::detect_orphans;
pub use preflight::validate_root;
pub use process::{CancellationToken, ProcessingResult, Processor, RunStatus};
pub use scan::{ScanResult, Scanner, scan_directory};
pub use sidecar::SIDECAR_SUFFIX;
pub use time::{Clock, SystemClock, TimestampValidator, ValidatedTimestamp};
pub use writer::apply_timestamp;
