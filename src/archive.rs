//! FMU archive handling.
//!
//! An FMU is a zip archive with a single `modelDescription.xml` entry at
//! its root. This module locates that entry and decodes it to text; it
//! never touches the rest of the archive (binaries, sources, resources
//! belong to the importer, not to the descriptor parser).

use std::io::{Cursor, Read};

use log::debug;
use zip::ZipArchive;

use crate::errors::DescriptorError;

/// Fixed, case-sensitive name of the descriptor entry.
pub const MODEL_DESCRIPTION_FILE: &str = "modelDescription.xml";

/// Upper bound on the archive buffer the reader accepts.
pub const MAX_ARCHIVE_SIZE: usize = 256 * 1024 * 1024;

/// Upper bound on the decompressed descriptor entry.
pub const MAX_DESCRIPTOR_SIZE: usize = 16 * 1024 * 1024;

/// Extract the descriptor text from raw FMU archive bytes.
///
/// Fails with [`DescriptorError::ArchiveFormat`] if the buffer is not a
/// zip archive, [`DescriptorError::DescriptorNotFound`] /
/// [`DescriptorError::DescriptorAmbiguous`] if the number of root-level
/// descriptor entries is not exactly one, and
/// [`DescriptorError::Encoding`] if the entry is not valid UTF-8.
pub fn read_descriptor_text(bytes: &[u8]) -> Result<String, DescriptorError> {
    if bytes.len() > MAX_ARCHIVE_SIZE {
        return Err(DescriptorError::InputTooLarge {
            actual: bytes.len(),
            limit: MAX_ARCHIVE_SIZE,
        });
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DescriptorError::ArchiveFormat(e.to_string()))?;
    debug!("opened FMU archive with {} entries", archive.len());

    // Writers disagree on whether root entries carry a "./" prefix, so
    // both spellings count as the root-level descriptor.
    let matches: Vec<String> = archive
        .file_names()
        .filter(|name| is_descriptor_entry(name))
        .map(str::to_string)
        .collect();
    let entry_name = match matches.as_slice() {
        [] => return Err(DescriptorError::DescriptorNotFound),
        [name] => name.clone(),
        _ => return Err(DescriptorError::DescriptorAmbiguous(matches.len())),
    };

    let mut entry = archive
        .by_name(&entry_name)
        .map_err(|e| DescriptorError::ArchiveFormat(e.to_string()))?;
    if entry.size() > MAX_DESCRIPTOR_SIZE as u64 {
        return Err(DescriptorError::InputTooLarge {
            actual: entry.size() as usize,
            limit: MAX_DESCRIPTOR_SIZE,
        });
    }

    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut raw)
        .map_err(|e| DescriptorError::ArchiveFormat(e.to_string()))?;

    decode_utf8(raw)
}

/// Exact, case-sensitive match against the root-level descriptor name.
fn is_descriptor_entry(name: &str) -> bool {
    name.strip_prefix("./").unwrap_or(name) == MODEL_DESCRIPTION_FILE
}

/// Decode descriptor bytes, tolerating a UTF-8 byte-order mark.
fn decode_utf8(mut raw: Vec<u8>) -> Result<String, DescriptorError> {
    if raw.starts_with(&[0xEF, 0xBB, 0xBF]) {
        raw.drain(..3);
    }
    String::from_utf8(raw).map_err(|e| DescriptorError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn archive_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_root_descriptor() {
        let bytes = archive_with(&[
            ("binaries/linux64/tank.so", b"\x7fELF"),
            (MODEL_DESCRIPTION_FILE, b"<fmiModelDescription/>"),
        ]);
        let text = read_descriptor_text(&bytes).unwrap();
        assert_eq!(text, "<fmiModelDescription/>");
    }

    #[test]
    fn accepts_dot_slash_prefixed_entry() {
        let bytes = archive_with(&[("./modelDescription.xml", b"<x/>")]);
        assert_eq!(read_descriptor_text(&bytes).unwrap(), "<x/>");
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(b"<x/>");
        let bytes = archive_with(&[(MODEL_DESCRIPTION_FILE, &body)]);
        assert_eq!(read_descriptor_text(&bytes).unwrap(), "<x/>");
    }

    #[test]
    fn rejects_non_archive_bytes() {
        let err = read_descriptor_text(b"this is not a zip").unwrap_err();
        assert!(matches!(err, DescriptorError::ArchiveFormat(_)));
    }

    #[test]
    fn rejects_missing_descriptor() {
        let bytes = archive_with(&[("documentation/index.html", b"<html/>")]);
        assert!(matches!(
            read_descriptor_text(&bytes),
            Err(DescriptorError::DescriptorNotFound)
        ));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let bytes = archive_with(&[("MODELDESCRIPTION.XML", b"<x/>")]);
        assert!(matches!(
            read_descriptor_text(&bytes),
            Err(DescriptorError::DescriptorNotFound)
        ));
    }

    #[test]
    fn nested_descriptor_does_not_count() {
        let bytes = archive_with(&[("resources/modelDescription.xml", b"<x/>")]);
        assert!(matches!(
            read_descriptor_text(&bytes),
            Err(DescriptorError::DescriptorNotFound)
        ));
    }

    #[test]
    fn rejects_duplicate_descriptor_entries() {
        let bytes = archive_with(&[
            (MODEL_DESCRIPTION_FILE, b"<a/>"),
            ("./modelDescription.xml", b"<b/>"),
        ]);
        match read_descriptor_text(&bytes) {
            Err(DescriptorError::DescriptorAmbiguous(n)) => assert_eq!(n, 2),
            other => panic!("expected DescriptorAmbiguous, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_utf8_entry() {
        let bytes = archive_with(&[(MODEL_DESCRIPTION_FILE, &[0xFF, 0xFE, 0x00][..])]);
        assert!(matches!(
            read_descriptor_text(&bytes),
            Err(DescriptorError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_oversized_input() {
        // The guard fires before any archive parsing happens.
        let huge = vec![0u8; MAX_ARCHIVE_SIZE + 1];
        assert!(matches!(
            read_descriptor_text(&huge),
            Err(DescriptorError::InputTooLarge { .. })
        ));
    }
}
