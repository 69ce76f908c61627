//! Package archive IO.
//!
//! `.wgt` and `.tpk` packages are plain zip archives. Reading flattens the
//! archive into the ordered file-entry list the signing pipeline consumes;
//! writing rebuilds the archive from a signed list. Stale signature files
//! are dropped on read so an already-signed package can be re-signed.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::domain::types::FileEntry;
use crate::infra::error::{SigningError, SigningResult};

pub struct PackageArchiveService;

impl PackageArchiveService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read package members in archive order, skipping directories and any
    /// previous signature files. Entry URIs are percent-encoded paths
    /// relative to the package root.
    pub fn read_entries(&self, package: &[u8]) -> SigningResult<Vec<FileEntry>> {
        let mut archive = ZipArchive::new(Cursor::new(package))
            .map_err(|e| SigningError::ArchiveError(format!("Failed to open package: {e}")))?;

        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let mut member = archive.by_index(index)?;
            if member.is_dir() {
                continue;
            }
            let name = member.name().to_string();
            if is_signature_file(&name) {
                log::debug!("Dropping existing signature file: {name}");
                continue;
            }
            let mut data = Vec::with_capacity(member.size() as usize);
            member.read_to_end(&mut data)?;
            entries.push(FileEntry::new(encode_uri(&name), data));
        }
        Ok(entries)
    }

    /// Write the entry list back out as a deflated zip archive, in list
    /// order (signature files first after signing).
    pub fn write_package(&self, entries: &[FileEntry]) -> SigningResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            writer.start_file(decode_uri(&entry.uri)?, options)?;
            writer.write_all(&entry.data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| SigningError::ArchiveError(format!("Failed to finish package: {e}")))?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageArchiveService {
    fn default() -> Self {
        Self::new()
    }
}

/// `author-signature.xml` or `signature<N>.xml` at the package root.
fn is_signature_file(name: &str) -> bool {
    if name == "author-signature.xml" {
        return true;
    }
    name.strip_prefix("signature")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Percent-encode an archive path for use as a reference URI. Unreserved
/// characters and path separators pass through; everything else becomes
/// UTF-8 `%XX` escapes.
fn encode_uri(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')'
            | b'/' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

/// Reverse of `encode_uri`, recovering the archive path.
fn decode_uri(uri: &str) -> SigningResult<String> {
    let mut bytes = Vec::with_capacity(uri.len());
    let mut input = uri.bytes();
    while let Some(byte) = input.next() {
        if byte != b'%' {
            bytes.push(byte);
            continue;
        }
        let hi = input.next();
        let lo = input.next();
        let decoded = match (hi, lo) {
            (Some(hi), Some(lo)) => {
                let hex = [hi, lo];
                std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            }
            _ => None,
        };
        match decoded {
            Some(value) => bytes.push(value),
            None => {
                return Err(SigningError::InvalidInput(format!(
                    "Invalid percent-escape in entry URI: {uri}"
                )))
            }
        }
    }
    String::from_utf8(bytes).map_err(|e| {
        SigningError::InvalidInput(format!("Entry URI decodes to invalid UTF-8: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_package(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in members {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_entries_in_archive_order() {
        let package = build_package(&[
            ("config.xml", b"<widget/>"),
            ("js/app.js", b"void 0;"),
            ("index.html", b"<html></html>"),
        ]);

        let entries = PackageArchiveService::new().read_entries(&package).unwrap();
        let uris: Vec<&str> = entries.iter().map(|e| e.uri.as_str()).collect();
        assert_eq!(uris, ["config.xml", "js/app.js", "index.html"]);
        assert_eq!(entries[1].data, b"void 0;");
    }

    #[test]
    fn drops_existing_signature_files() {
        let package = build_package(&[
            ("author-signature.xml", b"old"),
            ("signature1.xml", b"old"),
            ("signature22.xml", b"old"),
            ("config.xml", b"<widget/>"),
            ("signatures.xml", b"not a signature"),
        ]);

        let entries = PackageArchiveService::new().read_entries(&package).unwrap();
        let uris: Vec<&str> = entries.iter().map(|e| e.uri.as_str()).collect();
        assert_eq!(uris, ["config.xml", "signatures.xml"]);
    }

    #[test]
    fn round_trips_through_write() {
        let service = PackageArchiveService::new();
        let entries = vec![
            FileEntry::new("config.xml", b"<widget/>".to_vec()),
            FileEntry::new("res/ic%C3%B4ne.png", vec![0x89, 0x50]),
        ];

        let package = service.write_package(&entries).unwrap();
        let reread = service.read_entries(&package).unwrap();
        assert_eq!(reread, entries);
    }

    #[test]
    fn uri_encoding_round_trip() {
        assert_eq!(encode_uri("js/app.js"), "js/app.js");
        assert_eq!(encode_uri("my file.js"), "my%20file.js");
        assert_eq!(encode_uri("icône.png"), "ic%C3%B4ne.png");
        assert_eq!(decode_uri("ic%C3%B4ne.png").unwrap(), "icône.png");
        assert!(decode_uri("bad%ZZ").is_err());
        assert!(decode_uri("truncated%2").is_err());
    }
}
