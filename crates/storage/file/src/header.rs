//! Store File Header
//! -----------------
//!
//! Every store file starts with a small **unencrypted** header. It identifies the format and
//! records the logical length of the stream, which cannot be derived from the file size because
//! page slots are padded and ciphertext sizes vary.
//!
//! All integers are stored in **little-endian** format.
//!
//! # Binary Layout
//!
//! | Field            | Type     | Offset              | Description |
//! |------------------|----------|---------------------|-------------|
//! | `marker`         | [u8; 3]  | [`MARKER_OFFSET`]   | ASCII [`MARKER`], identifies a store file. |
//! | `version`        | u8       | [`VERSION_OFFSET`]  | Format version. Read and kept, does not change behaviour yet. |
//! | `logical_length` | u64      | [`LENGTH_OFFSET`]   | Logical length of the byte stream. |
//!
//! Page records start right after the header, at [`DATA_OFFSET`].

use crate::errors::{FileError, FormatError};
use crate::positional_io::read_full_at;
use binary_helpers::le::{read_u64, write_u64};
use std::fs::File;

/// Format identification bytes.
pub const MARKER: [u8; 3] = *b"PVX";

/// Version written into new files.
pub const FORMAT_VERSION: u8 = 1;

pub const MARKER_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 3;
pub const LENGTH_OFFSET: usize = 4;

/// Total size of the header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Offset of the first page slot.
pub const DATA_OFFSET: u64 = HEADER_SIZE as u64;

/// Decoded store file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
    pub logical_length: u64,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHeader {
    /// Header of a freshly created, empty store.
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            logical_length: 0,
        }
    }

    pub fn encode(&self) -> Result<[u8; HEADER_SIZE], FileError> {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[MARKER_OFFSET..VERSION_OFFSET].copy_from_slice(&MARKER);
        bytes[VERSION_OFFSET] = self.version;
        write_u64(&mut bytes, LENGTH_OFFSET, self.logical_length)?;
        Ok(bytes)
    }

    /// Decodes and validates a header. The marker must match exactly.
    pub fn decode(bytes: &[u8]) -> Result<Self, FileError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::TruncatedHeader {
                actual: bytes.len() as u64,
            }
            .into());
        }

        let mut found = [0u8; 3];
        found.copy_from_slice(&bytes[MARKER_OFFSET..VERSION_OFFSET]);
        if found != MARKER {
            return Err(FormatError::BadMarker { found }.into());
        }

        Ok(Self {
            version: bytes[VERSION_OFFSET],
            logical_length: read_u64(bytes, LENGTH_OFFSET)?,
        })
    }

    /// Reads and validates the header at the start of `file`.
    pub fn read_from(file: &File) -> Result<Self, FileError> {
        let mut bytes = [0u8; HEADER_SIZE];
        let read = read_full_at(file, &mut bytes, 0)?;
        Self::decode(&bytes[..read])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positional_io::write_all_at;

    #[test]
    fn new_header_encodes_marker_version_and_zero_length() {
        let bytes = FileHeader::new().encode().unwrap();
        assert_eq!(&bytes[..3], b"PVX");
        assert_eq!(bytes[3], FORMAT_VERSION);
        assert_eq!(&bytes[4..], &[0u8; 8]);
    }

    #[test]
    fn decode_reads_back_encoded_header() {
        let header = FileHeader {
            version: 7,
            logical_length: 10_000,
        };
        let decoded = FileHeader::decode(&header.encode().unwrap()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn decode_rejects_bad_marker() {
        let mut bytes = FileHeader::new().encode().unwrap();
        bytes[1] = b'Q';

        let result = FileHeader::decode(&bytes);

        assert!(matches!(
            result,
            Err(FileError::Format(FormatError::BadMarker { found })) if &found == b"PQX"
        ));
    }

    #[test]
    fn decode_rejects_short_header() {
        let result = FileHeader::decode(b"PVX\x01");
        assert!(matches!(
            result,
            Err(FileError::Format(FormatError::TruncatedHeader { actual: 4 }))
        ));
    }

    #[test]
    fn read_from_empty_file_is_truncated() {
        let file = tempfile::tempfile().unwrap();
        assert!(matches!(
            FileHeader::read_from(&file),
            Err(FileError::Format(FormatError::TruncatedHeader { actual: 0 }))
        ));
    }

    #[test]
    fn read_from_file_with_header() {
        let file = tempfile::tempfile().unwrap();
        let header = FileHeader {
            version: FORMAT_VERSION,
            logical_length: 42,
        };
        write_all_at(&file, &header.encode().unwrap(), 0).unwrap();

        assert_eq!(FileHeader::read_from(&file).unwrap(), header);
    }
}
