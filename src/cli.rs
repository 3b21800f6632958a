//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Photo Timestamp Updater - restore capture times on Google Photos exports
///
/// Recursively processes all .supplemental-metadata.json files in the given
/// folder and sets the access and modification times of each corresponding
/// media file to its photoTakenTime.
#[derive(Parser, Debug)]
#[command(name = "photo-timestamp-updater")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder containing the Google Photos export data
    #[arg(required_unless_present = "print_config")]
    pub folder_path: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directories to skip (absolute paths or folder names)
    #[arg(short, long, num_args = 1..)]
    pub exclude: Option<Vec<PathBuf>>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose console output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log file format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Don't create a log file in the export folder
    #[arg(long)]
    pub no_log_file: bool,

    /// Print a sample configuration file and exit
    #[arg(long, conflicts_with = "save_config")]
    pub print_config: bool,

    /// Write the effective configuration to a TOML file and exit
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref folder) = self.folder_path {
            config.root_dir = folder.clone();
        }
        if let Some(ref exclude) = self.exclude {
            config.exclude_dirs = exclude.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.json_log {
            config.json_log = true;
        }
        if self.no_log_file {
            config.log_file = false;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
