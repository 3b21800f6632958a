//! Batch processor
//!
//! Handles the core logic of:
//! - Scanning the export folder
//! - Detecting media files without metadata
//! - Running Parse → Resolve → Verify → Write for every sidecar
//! - Aggregating results without letting one bad file stop the run

use crate::config::Config;
use crate::error::{FileError, Result, WriteError};
use crate::orphan::detect_orphans;
use crate::scan::Scanner;
use crate::sidecar::{media_path_for, parse_sidecar, verify_media_file};
use crate::time::{Clock, SystemClock, TimestampValidator, ValidatedTimestamp};
use crate::writer::apply_timestamp;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, debug, error, info, span, warn};

/// Shared flag used to stop a running batch between files
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every sidecar was applied
    Success,
    /// At least one sidecar failed
    Failed,
    /// Stopped by the user before the batch finished
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failed => 1,
            RunStatus::Interrupted => 130,
        }
    }
}

/// Aggregate statistics for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingResult {
    pub total_metadata_files: usize,
    pub successful_updates: usize,
    pub failed_updates: usize,
    pub media_without_metadata: usize,
    /// One entry per failed sidecar, in processing order
    pub errors: Vec<String>,
    pub interrupted: bool,
}

impl ProcessingResult {
    pub fn new(total_metadata_files: usize) -> Self {
        Self {
            total_metadata_files,
            ..Self::default()
        }
    }

    /// Fold one file's outcome into the totals
    pub fn record(&mut self, sidecar: &Path, outcome: &std::result::Result<FileUpdate, FileError>) {
        match outcome {
            Ok(_) => self.successful_updates += 1,
            Err(e) => {
                self.failed_updates += 1;
                self.errors.push(format!("{}: {}", sidecar.display(), e));
            }
        }
    }

    /// Sidecars that were not reached because the run was interrupted
    pub fn unprocessed(&self) -> usize {
        self.total_metadata_files
            .saturating_sub(self.successful_updates + self.failed_updates)
    }

    /// Percentage of sidecars applied successfully (0 when there are none)
    pub fn success_rate(&self) -> f64 {
        if self.total_metadata_files == 0 {
            return 0.0;
        }
        self.successful_updates as f64 / self.total_metadata_files as f64 * 100.0
    }

    pub fn status(&self) -> RunStatus {
        if self.interrupted {
            RunStatus::Interrupted
        } else if self.failed_updates > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Success
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Successful: {}, Failed: {}, Without metadata: {}",
            self.total_metadata_files,
            self.successful_updates,
            self.failed_updates,
            self.media_without_metadata
        )
    }
}

/// A sidecar that made it through the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub sidecar: PathBuf,
    pub media: PathBuf,
    pub timestamp: ValidatedTimestamp,
    /// False in dry-run mode
    pub applied: bool,
}

/// Per-file progress notification
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based index of the file just processed
    pub current: usize,
    pub total: usize,
    pub sidecar: &'a Path,
    pub succeeded: bool,
}

/// Progress is logged every `interval` files, on the last file, and after
/// every file when the batch is small.
pub fn should_report_progress(
    current: usize,
    total: usize,
    interval: usize,
    small_batch_threshold: usize,
) -> bool {
    current % interval.max(1) == 0 || current == total || total <= small_batch_threshold
}

/// Main processor for restoring timestamps
pub struct Processor {
    config: Config,
    validator: TimestampValidator,
    cancel: CancellationToken,
    skip_files: Vec<PathBuf>,
}

impl Processor {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.check()?;
        let validator = TimestampValidator::from_config(&config, Arc::new(SystemClock));

        Ok(Self {
            config,
            validator,
            cancel: CancellationToken::new(),
            skip_files: Vec::new(),
        })
    }

    /// Replace the wall clock used for timestamp validation
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.validator = TimestampValidator::from_config(&self.config, clock);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Leave a file out of the scan (the run's own log file)
    pub fn skip_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.skip_files.push(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the full pipeline over the configured root folder
    pub fn run(&self) -> Result<ProcessingResult> {
        self.run_with_progress(|_| {})
    }

    /// Same as [`Processor::run`], reporting each processed file to `on_progress`
    pub fn run_with_progress<F>(&self, on_progress: F) -> Result<ProcessingResult>
    where
        F: FnMut(&Progress<'_>),
    {
        let _span = span!(Level::INFO, "processor_run").entered();
        let root = &self.config.root_dir;

        info!("Step 1: Scanning directory structure");
        let scanner = self
            .skip_files
            .iter()
            .fold(
                Scanner::from_config(&self.config).with_cancellation(self.cancel.clone()),
                |scanner, path| scanner.skip_file(path),
            );
        let scan = scanner.scan(root)?;
        if scan.interrupted {
            return Ok(ProcessingResult {
                interrupted: true,
                ..ProcessingResult::default()
            });
        }

        info!("Step 2: Detecting orphaned media files");
        let orphans = detect_orphans(&scan.sidecars, &scan.media);

        let mut result = if scan.sidecars.is_empty() {
            warn!(root = %root.display(), "No metadata files found in the specified directory");
            ProcessingResult::new(0)
        } else {
            info!("Step 3: Processing metadata files and updating timestamps");
            self.process_all_with_progress(&scan.sidecars, on_progress)
        };
        result.media_without_metadata = orphans.len();
        if self.cancel.is_cancelled() && !result.interrupted {
            warn!("Processing interrupted by user");
            result.interrupted = true;
        }

        info!("{}", result.summary());
        Ok(result)
    }

    /// Process every sidecar in order, isolating per-file failures
    pub fn process_all(&self, sidecars: &[PathBuf]) -> ProcessingResult {
        self.process_all_with_progress(sidecars, |_| {})
    }

    pub fn process_all_with_progress<F>(
        &self,
        sidecars: &[PathBuf],
        mut on_progress: F,
    ) -> ProcessingResult
    where
        F: FnMut(&Progress<'_>),
    {
        let total = sidecars.len();
        let mut result = ProcessingResult::new(total);
        info!(total, dry_run = self.config.dry_run, "Processing metadata files");

        for (index, sidecar) in sidecars.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    processed = index,
                    remaining = total - index,
                    "Processing interrupted by user"
                );
                result.interrupted = true;
                break;
            }

            let current = index + 1;
            debug!(current, total, ?sidecar, "Processing file");

            let outcome = self.process_sidecar(sidecar);
            if let Err(e) = &outcome {
                error!(
                    sidecar = %sidecar.display(),
                    stage = %e.stage(),
                    error = %e,
                    "Failed to process metadata file"
                );
            }
            result.record(sidecar, &outcome);

            on_progress(&Progress {
                current,
                total,
                sidecar,
                succeeded: outcome.is_ok(),
            });

            if should_report_progress(
                current,
                total,
                self.config.progress_interval,
                self.config.small_batch_threshold,
            ) {
                info!(
                    "PROGRESS: {}/{} metadata files processed ({:.1}%)",
                    current,
                    total,
                    current as f64 / total as f64 * 100.0
                );
                info!(
                    successful = result.successful_updates,
                    failed = result.failed_updates,
                    "Current status"
                );
            }
        }

        // An interrupt during the last file still counts
        if !result.interrupted && self.cancel.is_cancelled() {
            warn!(processed = total, "Interrupt received during the final file");
            result.interrupted = true;
        }

        info!(
            successful = result.successful_updates,
            failed = result.failed_updates,
            interrupted = result.interrupted,
            "Main processing completed"
        );

        result
    }

    /// Parse → Resolve → Verify → Write for a single sidecar
    pub fn process_sidecar(&self, sidecar: &Path) -> std::result::Result<FileUpdate, FileError> {
        let _file_span = span!(Level::DEBUG, "process_file", ?sidecar).entered();

        let metadata = parse_sidecar(sidecar).map_err(FileError::Parse)?;
        let media = media_path_for(sidecar).map_err(FileError::Resolve)?;
        verify_media_file(&media).map_err(FileError::Verify)?;

        if self.config.dry_run {
            let timestamp = self
                .validator
                .validate(metadata.photo_taken_time)
                .map_err(|e| {
                    FileError::Write(WriteError::Validation {
                        path: media.clone(),
                        source: e,
                    })
                })?;
            info!(
                media = %media.display(),
                time = %timestamp.to_local_string(),
                "Would update timestamps"
            );
            return Ok(FileUpdate {
                sidecar: sidecar.to_path_buf(),
                media,
                timestamp,
                applied: false,
            });
        }

        let timestamp = apply_timestamp(&media, metadata.photo_taken_time, &self.validator)
            .map_err(FileError::Write)?;
        debug!(?sidecar, ?media, "Successfully processed");

        Ok(FileUpdate {
            sidecar: sidecar.to_path_buf(),
            media,
            timestamp,
            applied: true,
        })
    }
}
