use thiserror::Error;

/// Errors raised by the paging engine. `E` is the error type of the underlying page file.
#[derive(Debug, Error)]
pub enum PagingError<E: std::error::Error + 'static> {
    #[error("Page file error")]
    File(#[from] E),
    #[error(
        "Read of {requested} bytes at position {position} goes past the end of the stream ({length} bytes)"
    )]
    ReadPastEnd {
        position: u64,
        requested: u64,
        length: u64,
    },
    #[error("Stream has been closed")]
    Closed,
}
