//! Rename target generation

use crate::config::RENAME_FORMAT;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Base name (no extension) encoding a timestamp, e.g. `2024-01-15 143000`
pub fn timestamp_base_name(timestamp: &DateTime<Local>) -> String {
    timestamp.format(RENAME_FORMAT).to_string()
}

/// Destination for renaming `original` to `new_base`
///
/// The file stays in its directory and keeps its extension, lowercased.
/// When `new_base` already is the file's base name the original path is
/// returned. Otherwise `new_base`, `new_base[2]`, `new_base[3]`, ... are
/// probed and the first path that does not exist wins.
pub fn unique_target_path(original: &Path, new_base: &str) -> PathBuf {
    let current_base = original.file_stem().map(|s| s.to_string_lossy());
    if current_base.as_deref() == Some(new_base) {
        return original.to_path_buf();
    }

    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    let extension = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let mut candidate = parent.join(format!("{new_base}{extension}"));
    let mut index = 2u64;
    while candidate.exists() {
        trace!(?candidate, "Rename target taken");
        candidate = parent.join(format!("{new_base}[{index}]{extension}"));
        index += 1;
    }
    candidate
}
