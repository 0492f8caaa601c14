//! Media Timestamp - stamp media files with their real creation time
//!
//! This library provides functionality for:
//! - Reading EXIF and QuickTime metadata into prioritized containers
//! - Resolving one creation timestamp through per-container tag fallbacks
//! - Applying that timestamp to file creation/modification times
//! - Renaming files to `YYYY-MM-DD HHmmss` without clobbering neighbours
//! - Walking folders with per-file error collection

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod os;
pub mod process;
pub mod rename;
pub mod time;
pub mod walk;

#[cfg(test)]
mod fixtures;

pub use cli::{Cli, Command};
pub use config::{LogSettings, ProcessOptions, WalkConfig};
pub use error::{Error, Result};
pub use metadata::{Container, ContainerKind, DateTag};
pub use process::{ProcessedFile, describe_file, list_file, process_file, write_containers};
pub use time::{ResolvedTime, TimeSource, resolve_timestamp};
pub use walk::{FileError, WalkReport, walk_folder};
