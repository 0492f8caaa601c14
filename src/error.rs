//! Error types for media-timestamp

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-timestamp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-timestamp
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Failed to read QuickTime atoms from {path}: {message}")]
    QuickTimeRead { path: PathBuf, message: String },

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid file name pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Folder does not exist or is not a directory: {path}")]
    FolderNotFound { path: PathBuf },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
