//! Per-file actions
//!
//! - [`process_file`]: resolve, stamp file times, optionally rename
//! - [`list_file`]: resolve only
//! - [`describe_file`]: dump every metadata container

use crate::config::ProcessOptions;
use crate::error::Result;
use crate::metadata::{self, Container};
use crate::os;
use crate::rename::{timestamp_base_name, unique_target_path};
use crate::time::{ResolvedTime, resolve_timestamp};
use filetime::FileTime;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Outcome of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    /// Timestamp applied to the file
    pub time: ResolvedTime,
    /// New location, if the file was moved
    pub renamed_to: Option<PathBuf>,
}

impl fmt::Display for ProcessedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time)?;
        if let Some(dest) = &self.renamed_to {
            write!(f, " -> {}", dest.display())?;
        }
        Ok(())
    }
}

/// Stamp a file with its resolved timestamp and optionally rename it
///
/// File times are set before the rename, so a failed rename still leaves
/// the new times in place.
pub fn process_file(path: &Path, options: ProcessOptions) -> Result<ProcessedFile> {
    let time = resolve_timestamp(path)?;
    apply_file_times(path, time.timestamp.into())?;

    let renamed_to = if options.rename {
        rename_to_timestamp(path, &time)?
    } else {
        None
    };

    Ok(ProcessedFile { time, renamed_to })
}

/// Resolve a file's timestamp without touching it
pub fn list_file(path: &Path) -> Result<ResolvedTime> {
    resolve_timestamp(path)
}

/// Every metadata container of a file, in the order they were read
pub fn describe_file(path: &Path) -> Result<Vec<Container>> {
    metadata::read_containers(path)
}

/// Write container names, each followed by its tags
pub fn write_containers<W: Write>(containers: &[Container], out: &mut W) -> Result<()> {
    for container in containers {
        writeln!(out, "[{}]", container.name())?;
        for tag in container.tags() {
            writeln!(out, "  {}: {}", tag.name, tag.description)?;
        }
    }
    Ok(())
}

/// Set the creation and last-modified times of a file
pub fn apply_file_times(path: &Path, time: SystemTime) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_system_time(time))?;
    if !os::set_created(path, time)? {
        debug!(?path, "Creation time is not settable on this platform");
    }
    info!(?path, "Applied file times");
    Ok(())
}

fn rename_to_timestamp(path: &Path, time: &ResolvedTime) -> Result<Option<PathBuf>> {
    let base = timestamp_base_name(&time.timestamp);
    let target = unique_target_path(path, &base);
    if target == path {
        debug!(?path, "File already carries its timestamp name");
        return Ok(None);
    }

    fs::rename(path, &target)?;
    info!(from = ?path, to = ?target, "Renamed file");
    Ok(Some(target))
}
