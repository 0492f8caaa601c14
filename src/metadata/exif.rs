//! EXIF containers for images

use super::{Container, ContainerKind, TagEntry, TagValue};
use crate::error::{Error, Result};
use exif::{Context, Exif, Field, In, Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

pub const EXIF_SUB_NAME: &str = "Exif SubIFD";
pub const EXIF_BASE_NAME: &str = "Exif IFD0";
pub const GPS_NAME: &str = "GPS";
pub const INTEROP_NAME: &str = "Interoperability";
pub const THUMBNAIL_NAME: &str = "Exif Thumbnail";

/// Read the EXIF containers of an image
///
/// Images without an EXIF segment produce no containers.
pub fn read_exif_containers(path: &Path) -> Result<Vec<Container>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(format)) => {
            trace!(?path, format, "No EXIF segment");
            return Ok(Vec::new());
        }
        Err(exif::Error::Io(e)) => return Err(Error::Io(e)),
        Err(e) => {
            return Err(Error::ExifRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    Ok(containers_from_exif(&exif))
}

/// Group parsed EXIF fields into one container per IFD
pub fn containers_from_exif(exif: &Exif) -> Vec<Container> {
    let mut containers: Vec<Container> = Vec::new();

    for field in exif.fields() {
        let (kind, name) = classify(field);
        let entry = tag_entry(field, exif);
        match containers.iter_mut().find(|c| c.name() == name) {
            Some(container) => container.push(entry),
            None => containers.push(Container::new(kind, name).with_tag(entry)),
        }
    }

    containers
}

fn classify(field: &Field) -> (ContainerKind, &'static str) {
    match field.tag.context() {
        Context::Exif => (ContainerKind::ExifSub, EXIF_SUB_NAME),
        Context::Gps => (ContainerKind::Other, GPS_NAME),
        Context::Interop => (ContainerKind::Other, INTEROP_NAME),
        Context::Tiff if field.ifd_num == In::PRIMARY => (ContainerKind::ExifBase, EXIF_BASE_NAME),
        _ => (ContainerKind::Other, THUMBNAIL_NAME),
    }
}

fn tag_entry(field: &Field, exif: &Exif) -> TagEntry {
    let value = match &field.value {
        Value::Ascii(parts) => match parts.first() {
            Some(bytes) => TagValue::Text(String::from_utf8_lossy(bytes).trim().to_string()),
            None => TagValue::Other,
        },
        _ => TagValue::Other,
    };

    TagEntry::new(
        field.tag.to_string(),
        field.display_value().with_unit(exif).to_string(),
        value,
    )
}
