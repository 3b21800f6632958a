//! Photo Timestamp Updater - restore capture times on Google Photos exports
//!
//! Reads every `.supplemental-metadata.json` sidecar below the given folder
//! and applies its photoTakenTime to the corresponding media file.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use photo_timestamp_updater::{
    CancellationToken, Cli, Config, Processor, RunStatus, report, validate_root,
};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const TOOL_NAME: &str = "photo-timestamp-updater";

fn main() {
    let cli = Cli::parse();

    let code = match run_cli_mode(&cli) {
        Ok(status) => status.exit_code(),
        Err(e) => {
            report::print_error(&format!("Error: {:#}", e));
            1
        }
    };

    std::process::exit(code);
}

/// Run in standard CLI mode. Logging is flushed before this returns.
fn run_cli_mode(cli: &Cli) -> Result<RunStatus> {
    if cli.print_config {
        print!("{}", Config::sample_config());
        return Ok(RunStatus::Success);
    }

    let config = load_config(cli)?;

    if let Some(ref path) = cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        report::print_hint(&format!("Configuration saved to: {}", path.display()));
        return Ok(RunStatus::Success);
    }

    report::print_title("Google Photos Timestamp Updater");
    report::print_hint(&format!("Processing folder: {}", config.root_dir.display()));

    if let Err(e) = validate_root(&config.root_dir) {
        report::print_error(&e.to_string());
        return Ok(RunStatus::Failed);
    }
    report::print_hint("Path validation successful - folder is accessible for reading and writing.");

    let requested_log = config.log_file.then(|| get_log_path(&config.root_dir));
    let (_guard, log_path) = setup_logging(&config, requested_log.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        folder = %config.root_dir.display(),
        dry_run = config.dry_run,
        "Google Photos Timestamp Updater started"
    );
    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping after the current file...");
        handler_token.cancel();
    })
    .context("Failed to install interrupt handler")?;

    let mut processor = Processor::new(config.clone())?.with_cancellation(token);
    if let Some(ref path) = log_path {
        processor = processor.skip_file(path);
    }

    let result = match processor.run() {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Unexpected error during processing");
            report::print_error(&format!("Error: Unexpected error during processing: {}", e));
            if let Some(ref path) = log_path {
                report::print_hint(&format!("Check the log file for details: {}", path.display()));
            }
            return Ok(RunStatus::Failed);
        }
    };

    if result.total_metadata_files == 0 && !result.interrupted {
        report::print_warning("No .supplemental-metadata.json files found in the specified directory.");
        report::print_hint("Please ensure you're pointing to a Google Photos export folder.");
        if result.media_without_metadata > 0 {
            report::print_hint(&format!(
                "{} media files without metadata were found.",
                result.media_without_metadata
            ));
        }
        return Ok(RunStatus::Success);
    }

    info!("Step 4: Generating final summary");
    report::log_summary(&result);
    report::print_summary(&result, log_path.as_deref());

    let status = result.status();
    match status {
        RunStatus::Success => info!("Processing completed successfully"),
        RunStatus::Failed => info!("Exiting with code 1 due to processing failures"),
        RunStatus::Interrupted => info!("Processing interrupted by user"),
    }

    Ok(status)
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };
    config.check()?;
    Ok(config)
}

/// Timestamped log file inside the export folder
fn get_log_path(root: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    root.join(format!("{}_{}.log", TOOL_NAME, timestamp))
}

/// Setup logging: full debug trace to the log file, summary level to stderr.
///
/// Returns the guard keeping the file writer alive and the log path actually
/// in use. A log file that can't be created falls back to console only.
fn setup_logging(config: &Config, log_path: Option<&Path>) -> (Option<WorkerGuard>, Option<PathBuf>) {
    let console_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let opened = log_path.map(|path| {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path);
        (path, file)
    });

    let (file_layer, guard, active, open_error) = match opened {
        Some((path, Ok(file))) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let file_filter = EnvFilter::builder()
                .with_default_directive(Level::DEBUG.into())
                .from_env_lossy();
            let layer = if config.json_log {
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_filter(file_filter)
                    .boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_filter(file_filter)
                    .boxed()
            };
            (Some(layer), Some(guard), Some(path.to_path_buf()), None)
        }
        Some((path, Err(e))) => (None, None, None, Some((path, e))),
        None => (None, None, None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some((path, e)) = open_error {
        error!(log_file = %path.display(), error = %e, "Failed to create log file");
        warn!("Continuing with console logging only");
    }
    if let Some(ref path) = active {
        info!(log_file = %path.display(), "Log file created");
    }

    (guard, active)
}
