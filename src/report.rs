//! Run summary for the console and the log file
//!
//! Console output uses crossterm styling; the log gets the same figures
//! through tracing.

use crate::process::{ProcessingResult, RunStatus};
use crossterm::{
    ExecutableCommand,
    style::{Color, Print, Stylize, style},
};
use std::io::stdout;
use std::path::Path;
use tracing::{debug, info};

/// CLI theme colors
pub struct CliTheme;

impl CliTheme {
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const HINT: Color = Color::DarkGrey;
    pub const ACCENT: Color = Color::Cyan;
}

const WIDTH: usize = 60;

/// Labelled figures shown in the final summary, in display order
pub fn summary_stats(result: &ProcessingResult) -> Vec<(&'static str, String)> {
    vec![
        (
            "Total metadata files processed",
            result.total_metadata_files.to_string(),
        ),
        (
            "Successful timestamp updates",
            result.successful_updates.to_string(),
        ),
        ("Failed timestamp updates", result.failed_updates.to_string()),
        (
            "Media files without metadata",
            result.media_without_metadata.to_string(),
        ),
        ("Success rate", format!("{:.1}%", result.success_rate())),
    ]
}

/// Notice shown when any sidecar failed
pub fn error_notice(result: &ProcessingResult) -> Option<String> {
    if result.errors.is_empty() {
        None
    } else {
        Some(format!(
            "{} errors encountered during processing.",
            result.errors.len()
        ))
    }
}

fn title_for(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Interrupted => "PROCESSING INTERRUPTED",
        _ => "PROCESSING COMPLETE",
    }
}

/// Write the summary to the log
pub fn log_summary(result: &ProcessingResult) {
    info!("{}", "=".repeat(WIDTH));
    info!("PROCESSING SUMMARY");
    info!("{}", "=".repeat(WIDTH));
    for (label, value) in summary_stats(result) {
        info!("{}: {}", label, value);
    }

    if result.errors.is_empty() {
        info!("No errors encountered during processing");
    } else {
        info!(count = result.errors.len(), "Total errors encountered");
        debug!("Error details:");
        for error in &result.errors {
            debug!("  - {}", error);
        }
    }

    if result.interrupted {
        info!(unprocessed = result.unprocessed(), "Run was interrupted before all files were processed");
    }
    info!("{}", "=".repeat(WIDTH));
}

/// Print the final summary block to stdout
pub fn print_summary(result: &ProcessingResult, log_path: Option<&Path>) {
    let status = result.status();

    print_blank();
    print_separator();
    print_title(title_for(status));
    print_separator();

    for (label, value) in summary_stats(result) {
        let color = match label {
            "Successful timestamp updates" => CliTheme::SUCCESS,
            "Failed timestamp updates" if result.failed_updates > 0 => CliTheme::ERROR,
            "Media files without metadata" if result.media_without_metadata > 0 => {
                CliTheme::WARNING
            }
            _ => CliTheme::ACCENT,
        };
        print_stat(label, &value, color);
    }

    if result.interrupted {
        print_blank();
        print_warning(&format!(
            "Interrupted by user; {} metadata files were not processed.",
            result.unprocessed()
        ));
    }

    if let Some(path) = log_path {
        print_log_path(&path.display().to_string());
    }

    if let Some(notice) = error_notice(result) {
        print_blank();
        print_error(&notice);
        print_hint("Check the log file for detailed error information.");
    }

    print_separator();
}

/// Print a separator line
pub fn print_separator() {
    let _ = stdout().execute(Print(format!("{}\n", "=".repeat(WIDTH))));
}

/// Print a centered title
pub fn print_title(title: &str) {
    let padding = WIDTH.saturating_sub(title.len()) / 2;
    let _ = stdout().execute(Print(" ".repeat(padding)));
    let _ = stdout().execute(Print(title.bold()));
    let _ = stdout().execute(Print("\n"));
}

pub fn print_warning(msg: &str) {
    let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
    let _ = stdout().execute(Print(format!("{}\n", msg)));
}

pub fn print_error(msg: &str) {
    let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
    let _ = stdout().execute(Print(format!("{}\n", msg)));
}

pub fn print_hint(msg: &str) {
    let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
    let _ = stdout().execute(Print(format!("{}\n", msg)));
}

/// Print a labelled statistic
pub fn print_stat(key: &str, value: &str, color: Color) {
    let _ = stdout().execute(Print("  "));
    let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
    let _ = stdout().execute(Print(": "));
    let _ = stdout().execute(Print(style(value).with(color).bold()));
    let _ = stdout().execute(Print("\n"));
}

pub fn print_log_path(path: &str) {
    let _ = stdout().execute(Print("\n"));
    let _ = stdout().execute(Print(style("  Detailed log file: ").with(CliTheme::HINT)));
    let _ = stdout().execute(Print(format!("{}\n", path)));
}

pub fn print_blank() {
    let _ = stdout().execute(Print("\n"));
}
