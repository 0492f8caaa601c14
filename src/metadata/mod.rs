//! Metadata containers
//!
//! Embedded metadata is exposed as a list of [`Container`]s, one per metadata
//! standard or segment found in a file:
//! - EXIF IFDs read with `kamadak-exif` (JPEG, TIFF/RAW, HEIF, PNG, WebP)
//! - QuickTime movie and metadata headers read with `mp4` (MOV, MP4)
//!
//! Containers are plain data. The binary decoding belongs to the underlying
//! crates; this module only groups their output and answers tag lookups.

pub mod datetime;
pub mod exif;
pub mod quicktime;

use crate::error::{Error, Result};
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Metadata standard a container belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// EXIF SubIFD (camera-specific tags such as `DateTimeOriginal`)
    ExifSub,
    /// EXIF IFD0 (generic TIFF-level tags such as `DateTime`)
    ExifBase,
    /// QuickTime `moov/meta` box with an `mdta` handler
    QuickTimeMetadataHeader,
    /// QuickTime `moov/mvhd` box
    QuickTimeMovieHeader,
    /// Anything else (GPS, interoperability, thumbnail IFDs, ...)
    Other,
}

/// Tags that can carry a creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTag {
    DateTimeDigitized,
    DateTimeOriginal,
    DateTime,
    CreationDate,
    Created,
}

impl DateTag {
    /// Tag name as it appears in a container
    pub fn name(self) -> &'static str {
        match self {
            DateTag::DateTimeDigitized => "DateTimeDigitized",
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::DateTime => "DateTime",
            DateTag::CreationDate => "CreationDate",
            DateTag::Created => "Created",
        }
    }

    /// EXIF offset tag that qualifies this date, if any
    fn offset_tag(self) -> Option<&'static str> {
        match self {
            DateTag::DateTimeDigitized => Some("OffsetTimeDigitized"),
            DateTag::DateTimeOriginal => Some("OffsetTimeOriginal"),
            DateTag::DateTime => Some("OffsetTime"),
            DateTag::CreationDate | DateTag::Created => None,
        }
    }

    fn is_exif(self) -> bool {
        self.offset_tag().is_some()
    }
}

impl fmt::Display for DateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed value of a tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Text value (EXIF ASCII, QuickTime UTF-8 item)
    Text(String),
    /// Absolute point in time (QuickTime header times)
    Instant(DateTime<Utc>),
    /// Plain integer
    Number(u64),
    /// Anything this crate does not interpret
    Other,
}

/// One tag of a container
#[derive(Debug, Clone, PartialEq)]
pub struct TagEntry {
    /// Tag name, e.g. `DateTimeOriginal`
    pub name: String,
    /// Human-readable rendering of the value
    pub description: String,
    /// Typed value used for lookups
    pub value: TagValue,
}

impl TagEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, value: TagValue) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value,
        }
    }

    /// Text entry whose description is the text itself
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(name, text.clone(), TagValue::Text(text))
    }
}

/// An already-parsed bag of tags for one metadata standard
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    kind: ContainerKind,
    name: String,
    tags: Vec<TagEntry>,
}

impl Container {
    pub fn new(kind: ContainerKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            tags: Vec::new(),
        }
    }

    /// Builder-style variant of [`Container::push`]
    pub fn with_tag(mut self, tag: TagEntry) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn push(&mut self, tag: TagEntry) {
        self.tags.push(tag);
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[TagEntry] {
        &self.tags
    }

    pub fn get(&self, name: &str) -> Option<&TagEntry> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    /// Look up `tag` and interpret it as a timestamp
    ///
    /// Returns `None` when the tag is missing or its value is not a date.
    pub fn timestamp(&self, tag: DateTag) -> Option<DateTime<Local>> {
        let entry = self.get(tag.name())?;
        match &entry.value {
            TagValue::Instant(instant) => Some(instant.with_timezone(&Local)),
            TagValue::Text(text) if tag.is_exif() => {
                let offset = tag
                    .offset_tag()
                    .and_then(|name| self.get(name))
                    .and_then(|entry| match &entry.value {
                        TagValue::Text(offset) => Some(offset.as_str()),
                        _ => None,
                    });
                datetime::parse_exif_datetime(text, offset)
            }
            TagValue::Text(text) => datetime::parse_iso_datetime(text),
            TagValue::Number(_) | TagValue::Other => None,
        }
    }
}

/// File formats this crate knows how to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Jpeg,
    Tiff,
    Png,
    WebP,
    Heif,
    QuickTime,
}

/// ISO-BMFF brands that denote HEIF still images rather than movies
const HEIF_BRANDS: &[&[u8; 4]] = &[b"heic", b"heix", b"hevc", b"mif1", b"msf1", b"avif"];

/// Leading atoms of QuickTime files written without an `ftyp` box
const QUICKTIME_LEADING_ATOMS: &[&[u8; 4]] = &[b"moov", b"mdat", b"wide", b"free", b"skip"];

/// Classify a file from its first bytes
pub fn sniff_format(header: &[u8]) -> Option<FileFormat> {
    if header.starts_with(&[0xFF, 0xD8]) {
        return Some(FileFormat::Jpeg);
    }
    if header.starts_with(b"II*\0") || header.starts_with(b"MM\0*") {
        return Some(FileFormat::Tiff);
    }
    if header.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some(FileFormat::Png);
    }
    if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some(FileFormat::WebP);
    }
    if header.len() >= 8 {
        let atom = &header[4..8];
        if atom == b"ftyp" {
            let is_heif = header.len() >= 12
                && HEIF_BRANDS.iter().any(|brand| &header[8..12] == brand.as_slice());
            return Some(if is_heif {
                FileFormat::Heif
            } else {
                FileFormat::QuickTime
            });
        }
        if QUICKTIME_LEADING_ATOMS
            .iter()
            .any(|leading| atom == leading.as_slice())
        {
            return Some(FileFormat::QuickTime);
        }
    }
    None
}

/// Read every metadata container of a file
///
/// A supported file without any embedded metadata yields an empty list.
pub fn read_containers(path: &Path) -> Result<Vec<Container>> {
    let mut header = Vec::with_capacity(12);
    File::open(path)?.take(12).read_to_end(&mut header)?;

    let format = sniff_format(&header).ok_or_else(|| Error::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    debug!(?path, ?format, "Detected file format");

    match format {
        FileFormat::QuickTime => quicktime::read_quicktime_containers(path),
        FileFormat::Jpeg
        | FileFormat::Tiff
        | FileFormat::Png
        | FileFormat::WebP
        | FileFormat::Heif => exif::read_exif_containers(path),
    }
}
