//! Test fixtures: small media files generated on the fly

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub fn ascii_field(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

/// Serialize `fields` as a little-endian TIFF stream
pub fn tiff_bytes(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, true).unwrap();
    buf.into_inner()
}

pub fn write_tiff(path: &Path, fields: &[Field]) {
    fs::write(path, tiff_bytes(fields)).unwrap();
}

/// JPEG made of SOI, one APP1 `Exif` segment and EOI
pub fn write_jpeg(path: &Path, fields: &[Field]) {
    let tiff = tiff_bytes(fields);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();

    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
    bytes.extend_from_slice(&segment_len.to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    fs::write(path, bytes).unwrap();
}

/// JPEG without any metadata segment
pub fn write_bare_jpeg(path: &Path) {
    fs::write(path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
}
