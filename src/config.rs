//! Configuration types for the timestamp updater

use crate::time::{FUTURE_TOLERANCE_SECS, MIN_EPOCH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the timestamp updater
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root folder of the Google Photos export
    pub root_dir: PathBuf,

    /// Directories to exclude from scanning (can be absolute paths or folder names)
    pub exclude_dirs: Vec<PathBuf>,

    /// Earliest accepted capture time (Unix seconds)
    pub min_timestamp: i64,

    /// How far past "now" a capture time may lie (seconds)
    pub max_future_secs: i64,

    /// Log progress every N sidecars
    pub progress_interval: usize,

    /// Batches at or below this size log progress after every sidecar
    pub small_batch_threshold: usize,

    /// Dry run mode - validate everything but don't touch any timestamps
    pub dry_run: bool,

    /// Verbose console output
    pub verbose: bool,

    /// Write the log file as JSON lines
    pub json_log: bool,

    /// Create a timestamped log file inside the root folder
    pub log_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            exclude_dirs: vec![],
            min_timestamp: MIN_EPOCH,
            max_future_secs: FUTURE_TOLERANCE_SECS,
            progress_interval: 10,
            small_batch_threshold: 20,
            dry_run: false,
            verbose: false,
            json_log: false,
            log_file: true,
        }
    }
}

impl Config {
    /// Create a configuration for the given root folder with default settings
    pub fn for_root<P: Into<PathBuf>>(root_dir: P) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.check()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Reject settings that would make the run meaningless
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval",
                message: "must be at least 1".into(),
            });
        }
        if self.min_timestamp <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_timestamp",
                message: "must be positive".into(),
            });
        }
        if self.max_future_secs < 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_future_secs",
                message: "must not be negative".into(),
            });
        }
        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Photo Timestamp Updater Configuration File
# This file uses TOML format (https://toml.io)

# Root folder of the Google Photos export (the CLI argument overrides this)
root_dir = "D:/Takeout/Google Photos"

# Directories to exclude from scanning
# Can be absolute paths or folder names (will match any folder with that name)
exclude_dirs = [
    ".thumbnails",
    "@eaDir",
]

# Accepted capture time range: min_timestamp <= t <= now + max_future_secs
# Default minimum is 1990-01-01T00:00:00Z, default tolerance is 365 days
min_timestamp = 631152000
max_future_secs = 31536000

# Progress reporting cadence
progress_interval = 10
small_batch_threshold = 20

# Dry run mode - show what would be done without actually doing it
dry_run = false

# Verbose output - show debug information on the console
verbose = false

# Log file settings
json_log = false
log_file = true
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError {
        source: toml::ser::Error,
    },
    /// A setting holds an unusable value
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}
