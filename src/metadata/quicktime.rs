//! QuickTime containers for MOV/MP4 files
//!
//! Two containers are produced from the `moov` atom:
//! - the movie header (`mvhd`) with its creation and modification times
//! - the metadata header (`meta` with an `mdta` handler), whose `keys` table
//!   names the items of `ilst` (`com.apple.quicktime.creationdate`, ...)

use super::{Container, ContainerKind, TagEntry, TagValue};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use mp4::{BoxType, MetaBox, Mp4Reader, MvhdBox};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

pub const MOVIE_HEADER_NAME: &str = "QuickTime Movie Header";
pub const METADATA_HEADER_NAME: &str = "QuickTime Metadata Header";

/// Seconds between 1904-01-01 (QuickTime epoch) and 1970-01-01 (Unix epoch)
const QUICKTIME_EPOCH_OFFSET: i64 = 2_082_844_800;

const KEYS_ATOM: u32 = u32::from_be_bytes(*b"keys");
const ILST_ATOM: u32 = u32::from_be_bytes(*b"ilst");
const DATA_ATOM: &[u8; 4] = b"data";

/// `data` atom type indicator for UTF-8 text
const WELL_KNOWN_UTF8: u32 = 1;

/// Display names for well-known `mdta` keys
const KNOWN_KEYS: &[(&str, &str)] = &[
    ("com.apple.quicktime.creationdate", "CreationDate"),
    ("com.apple.quicktime.make", "Make"),
    ("com.apple.quicktime.model", "Model"),
    ("com.apple.quicktime.software", "Software"),
    ("com.apple.quicktime.location.ISO6709", "Location"),
];

/// Read the QuickTime containers of a movie
pub fn read_quicktime_containers(path: &Path) -> Result<Vec<Container>> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let reader = BufReader::new(file);

    let mp4 = Mp4Reader::read_header(reader, size).map_err(|e| Error::QuickTimeRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut containers = vec![movie_header_container(&mp4.moov.mvhd)];
    match mp4.moov.meta.as_ref().and_then(metadata_header_container) {
        Some(container) => containers.push(container),
        None => trace!(?path, "No mdta metadata header"),
    }

    debug!(?path, count = containers.len(), "Read QuickTime containers");
    Ok(containers)
}

fn movie_header_container(mvhd: &MvhdBox) -> Container {
    Container::new(ContainerKind::QuickTimeMovieHeader, MOVIE_HEADER_NAME)
        .with_tag(time_entry("Created", mvhd.creation_time))
        .with_tag(time_entry("Modified", mvhd.modification_time))
        .with_tag(TagEntry::new(
            "Time Scale",
            mvhd.timescale.to_string(),
            TagValue::Number(u64::from(mvhd.timescale)),
        ))
        .with_tag(TagEntry::new(
            "Duration",
            mvhd.duration.to_string(),
            TagValue::Number(mvhd.duration),
        ))
}

fn time_entry(name: &str, seconds: u64) -> TagEntry {
    match quicktime_time(seconds) {
        Some(instant) => TagEntry::new(name, instant.to_rfc3339(), TagValue::Instant(instant)),
        None => TagEntry::new(name, "unset", TagValue::Number(seconds)),
    }
}

/// Convert a QuickTime header time to UTC; zero means the field was never set
pub fn quicktime_time(seconds: u64) -> Option<DateTime<Utc>> {
    if seconds == 0 {
        return None;
    }
    let unix = i64::try_from(seconds).ok()? - QUICKTIME_EPOCH_OFFSET;
    DateTime::from_timestamp(unix, 0)
}

fn metadata_header_container(meta: &MetaBox) -> Option<Container> {
    let MetaBox::Unknown { hdlr, data } = meta else {
        return None;
    };
    if hdlr.handler_type.value != *b"mdta" {
        return None;
    }

    let keys = data
        .iter()
        .find(|(box_type, _)| atom_code(*box_type) == KEYS_ATOM)
        .map(|(_, payload)| parse_keys(payload))?;
    let items = data
        .iter()
        .find(|(box_type, _)| atom_code(*box_type) == ILST_ATOM)
        .map(|(_, payload)| parse_ilst(payload))
        .unwrap_or_default();

    Some(metadata_header_from_items(&keys, &items))
}

fn atom_code(box_type: BoxType) -> u32 {
    u32::from(box_type)
}

/// Value of one `ilst` item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    Text(String),
    Binary { type_indicator: u32, len: usize },
}

/// Join `keys` names with `ilst` items (1-based key indices)
pub fn metadata_header_from_items(keys: &[String], items: &[(u32, ItemValue)]) -> Container {
    let mut container = Container::new(ContainerKind::QuickTimeMetadataHeader, METADATA_HEADER_NAME);

    for (index, value) in items {
        let Some(key) = (*index as usize)
            .checked_sub(1)
            .and_then(|i| keys.get(i))
        else {
            trace!(index, "ilst item without a key");
            continue;
        };

        let name = KNOWN_KEYS
            .iter()
            .find(|(raw, _)| *raw == key.as_str())
            .map_or(key.as_str(), |(_, display)| *display);

        let entry = match value {
            ItemValue::Text(text) => TagEntry::text(name, text.clone()),
            ItemValue::Binary {
                type_indicator,
                len,
            } => TagEntry::new(
                name,
                format!("[{len} bytes, type {type_indicator}]"),
                TagValue::Other,
            ),
        };
        container.push(entry);
    }

    container
}

/// Parse the payload of a `keys` atom into key names
pub fn parse_keys(payload: &[u8]) -> Vec<String> {
    let mut keys = Vec::new();
    // version + flags, entry count
    let Some(count) = read_u32(payload, 4) else {
        return keys;
    };

    let mut offset = 8;
    for _ in 0..count {
        let Some(size) = read_u32(payload, offset).map(|s| s as usize) else {
            break;
        };
        // size, namespace
        if size < 8 || offset + size > payload.len() {
            break;
        }
        keys.push(String::from_utf8_lossy(&payload[offset + 8..offset + size]).into_owned());
        offset += size;
    }

    keys
}

/// Parse the payload of an `ilst` atom into (key index, value) pairs
pub fn parse_ilst(payload: &[u8]) -> Vec<(u32, ItemValue)> {
    let mut items = Vec::new();

    for (index, item) in atoms(payload) {
        let data = atoms(item).find(|(code, _)| code.to_be_bytes() == *DATA_ATOM);
        let Some((_, data)) = data else {
            continue;
        };
        // type indicator, locale
        let Some(type_indicator) = read_u32(data, 0) else {
            continue;
        };
        let value = data.get(8..).unwrap_or_default();

        let value = if type_indicator == WELL_KNOWN_UTF8 {
            ItemValue::Text(String::from_utf8_lossy(value).into_owned())
        } else {
            ItemValue::Binary {
                type_indicator,
                len: value.len(),
            }
        };
        items.push((index, value));
    }

    items
}

/// Iterate the child atoms of a payload as (type code, payload)
fn atoms(payload: &[u8]) -> impl Iterator<Item = (u32, &[u8])> {
    let mut offset = 0usize;
    std::iter::from_fn(move || {
        let size = read_u32(payload, offset)? as usize;
        let code = read_u32(payload, offset + 4)?;
        let end = match size {
            0 => payload.len(),
            size if size >= 8 => offset.checked_add(size)?,
            _ => return None,
        };
        let body = payload.get(offset + 8..end)?;
        offset = end;
        Some((code, body))
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes(raw.try_into().ok()?))
}
