//! Creation time resolution
//!
//! The best timestamp of a file is found by:
//! 1. Ordering its metadata containers by reliability
//! 2. Trying each container's tag fallback chain, first hit wins
//! 3. Falling back to the file system creation time

use crate::error::Result;
use crate::metadata::{self, Container, ContainerKind, DateTag};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace};

/// Tags tried for both EXIF IFDs, in order
const EXIF_CHAIN: &[DateTag] = &[
    DateTag::DateTimeDigitized,
    DateTag::DateTimeOriginal,
    DateTag::DateTime,
];
const QUICKTIME_METADATA_CHAIN: &[DateTag] = &[DateTag::CreationDate];
const QUICKTIME_MOVIE_CHAIN: &[DateTag] = &[DateTag::Created];

impl ContainerKind {
    /// Rank of this container; lower ranks are tried first
    pub fn priority(self) -> u8 {
        match self {
            ContainerKind::ExifSub => 1,
            ContainerKind::ExifBase => 2,
            ContainerKind::QuickTimeMetadataHeader => 3,
            ContainerKind::QuickTimeMovieHeader => 4,
            ContainerKind::Other => 5,
        }
    }

    /// Tags to try on a container of this kind
    pub fn date_tags(self) -> &'static [DateTag] {
        match self {
            ContainerKind::ExifSub | ContainerKind::ExifBase => EXIF_CHAIN,
            ContainerKind::QuickTimeMetadataHeader => QUICKTIME_METADATA_CHAIN,
            ContainerKind::QuickTimeMovieHeader => QUICKTIME_MOVIE_CHAIN,
            ContainerKind::Other => &[],
        }
    }
}

/// Where a resolved timestamp came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSource {
    /// A tag of a metadata container
    Metadata { container: String, tag: DateTag },
    /// The file system creation time (or modification time where the
    /// platform does not record creation)
    FileCreated,
}

impl fmt::Display for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSource::Metadata { container, tag } => write!(f, "{container} / {tag}"),
            TimeSource::FileCreated => f.write_str("file creation time"),
        }
    }
}

/// Result of timestamp resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTime {
    /// The resolved timestamp
    pub timestamp: DateTime<Local>,
    /// Source of the timestamp
    pub source: TimeSource,
}

impl fmt::Display for ResolvedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.source
        )
    }
}

/// Order containers by ascending priority; equal ranks keep their order
pub fn prioritize(containers: &[Container]) -> Vec<&Container> {
    let mut ordered: Vec<&Container> = containers.iter().collect();
    ordered.sort_by_key(|container| container.kind().priority());
    ordered
}

/// First timestamp found by walking the prioritized containers and their chains
pub fn resolve_from_containers(containers: &[Container]) -> Option<ResolvedTime> {
    for container in prioritize(containers) {
        for &tag in container.kind().date_tags() {
            match container.timestamp(tag) {
                Some(timestamp) => {
                    debug!(container = container.name(), %tag, %timestamp, "Resolved timestamp");
                    return Some(ResolvedTime {
                        timestamp,
                        source: TimeSource::Metadata {
                            container: container.name().to_string(),
                            tag,
                        },
                    });
                }
                None => trace!(container = container.name(), %tag, "Tag absent or not a date"),
            }
        }
    }
    None
}

/// Resolve the creation timestamp of a file
///
/// Only fails when the file or its metadata cannot be read; a file without
/// any usable tag resolves to its file system creation time.
pub fn resolve_timestamp(path: &Path) -> Result<ResolvedTime> {
    let containers = metadata::read_containers(path)?;
    if let Some(resolved) = resolve_from_containers(&containers) {
        return Ok(resolved);
    }

    let timestamp = file_created(path)?;
    info!(?path, "No metadata timestamp, using file creation time");
    Ok(ResolvedTime {
        timestamp,
        source: TimeSource::FileCreated,
    })
}

/// File system creation time, or modification time where creation is unknown
pub fn file_created(path: &Path) -> Result<DateTime<Local>> {
    let metadata = fs::metadata(path)?;
    let time = match metadata.created() {
        Ok(created) => created,
        Err(e) => {
            debug!(?path, error = %e, "Creation time unavailable, using modification time");
            metadata.modified()?
        }
    };
    Ok(DateTime::from(time))
}
