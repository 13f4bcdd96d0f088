//! Error types of the `file` crate.

use binary_helpers::bin_error::BinaryError;
use binary_helpers::conversions::ConversionError;
use envelope::CryptoError;
use thiserror::Error;

/// The file does not look like a store file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Header marker {found:?} does not identify a store file")]
    BadMarker { found: [u8; 3] },
    #[error("File is {actual} bytes long, too short to hold a store header")]
    TruncatedHeader { actual: u64 },
}

/// Errors raised while reading or writing a page file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Invalid store file format")]
    Format(#[from] FormatError),
    #[error("Cryptographic failure on page {page_number}")]
    Crypto {
        page_number: u64,
        #[source]
        source: CryptoError,
    },
    #[error(
        "Sealed page {page_number} is {ciphertext_len} bytes, but a page slot only holds {capacity}"
    )]
    SlotOverflow {
        page_number: u64,
        ciphertext_len: usize,
        capacity: usize,
    },
    #[error(
        "Slot allowance of {slot_allowance} bytes cannot hold the {required} bytes of per-page overhead"
    )]
    SlotTooSmall {
        slot_allowance: usize,
        required: usize,
    },
    #[error("Record of page {page_number} claims {record_len} bytes, but a page slot only holds {capacity}")]
    CorruptRecord {
        page_number: u64,
        record_len: usize,
        capacity: usize,
    },
    #[error("Page {page_number} has {actual} bytes, expected {expected}")]
    PageSizeMismatch {
        page_number: u64,
        expected: usize,
        actual: usize,
    },
    #[error("Page {page_number} lies outside the addressable file range")]
    OffsetOverflow { page_number: u64 },
    #[error("Store was opened read-only")]
    ReadOnly,
    #[error("Store file has been closed")]
    Closed,
    #[error("Binary encoding error")]
    Binary(#[from] BinaryError),
    #[error("Value does not fit its on-disk field")]
    Conversion(#[from] ConversionError),
}
