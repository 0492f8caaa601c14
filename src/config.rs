//! Run-time configuration
//!
//! Nothing is persisted: a run is configured by its positional arguments and,
//! for logging, by environment variables.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::env;
use std::path::{Path, PathBuf};

/// Pattern used when `list`/`process` get no pattern argument
pub const DEFAULT_PATTERN: &str = "*";

/// `chrono` format of renamed base names: `YYYY-MM-DD HHmmss`
pub const RENAME_FORMAT: &str = "%Y-%m-%d %H%M%S";

/// Directory for an additional log file
pub const LOG_DIR_ENV: &str = "MEDIA_TIMESTAMP_LOG_DIR";

/// File name of the log written to [`LOG_DIR_ENV`]
pub const LOG_FILE_NAME: &str = "media-timestamp.log";

/// File-name matching ignores case (`*.jpg` matches `IMG_0001.JPG`)
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Folder walk configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Root folder, walked recursively
    pub folder: PathBuf,
    /// File name pattern
    pub pattern: Pattern,
}

impl WalkConfig {
    /// Build a walk configuration, compiling `pattern` (default `*`)
    pub fn new(folder: impl Into<PathBuf>, pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern.unwrap_or(DEFAULT_PATTERN);
        let compiled = Pattern::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            folder: folder.into(),
            pattern: compiled,
        })
    }

    /// Check whether a file name matches the pattern, ignoring case
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
    }
}

/// Options of the `process` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Rename files after their resolved timestamp
    pub rename: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { rename: true }
    }
}

/// Logging settings read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Directory receiving [`LOG_FILE_NAME`], if any
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let dir = env::var_os(LOG_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { dir }
    }
}
