use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors that can occur when working with binary data.
#[derive(Error, Debug)]
pub enum BinaryError {
    /// The requested range does not fit in the provided byte slice.
    #[error(
        "Attempt to access {expected} bytes from offset {from_offset}, but the slice only holds {available} bytes."
    )]
    RangeOutOfBounds {
        expected: usize,
        from_offset: usize,
        available: usize,
    },
    /// Error indicating a failure to convert a slice to an array.
    #[error("Error converting a slice")]
    SliceConversionError(#[from] TryFromSliceError),
    /// Error indicating a size mismatch when writing data.
    #[error(
        "Error when attempting to write data due to size mismatch: source {src} vs target {target}"
    )]
    WriteErrorSliceSizeMismatch { src: usize, target: usize },
}
