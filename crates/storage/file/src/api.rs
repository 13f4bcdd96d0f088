//! Public API for the `file` crate

/// Page file public API
///
/// A `PageFile` stores a sequence of fixed-size pages addressed by a zero-based page number, and
/// records the logical length of the byte stream those pages hold. Implementations are free to
/// choose the physical layout (encryption, padding, in-memory maps). The paging engine only ever
/// talks to storage through this trait.
pub trait PageFile {
    /// Error reported by the physical primitives.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Definition
    /// Read the page identified by `page_number` into `destination`.
    ///
    /// Params
    /// - `page_number`: Zero-based number of the page to read.
    /// - `destination`: Caller-provided buffer to receive the page bytes. Its length must equal
    ///   the page size the file was opened with.
    ///
    /// Return
    /// - `Ok(())` once `destination` holds the page. A page that was never written is returned as
    ///   all zeros.
    /// - `Err(_)` if the page could not be read or decoded. No partial page is ever returned.
    fn read_page(&self, page_number: u64, destination: &mut [u8]) -> Result<(), Self::Error>;

    /// Definition
    /// Write the contents of `page_data` as the page for `page_number`.
    ///
    /// Params
    /// - `page_number`: Zero-based number of the page to write.
    /// - `page_data`: Exactly one page worth of data.
    /// - `logical_length`: Logical length of the stream after this write. Implementations
    ///   persist it when it grows past the length they currently record.
    fn write_page(
        &mut self,
        page_number: u64,
        page_data: &[u8],
        logical_length: u64,
    ) -> Result<(), Self::Error>;

    /// Logical length of the stream as recorded by the file.
    fn length(&self) -> u64;

    /// Creates a second instance over the same physical storage, used by read cursors. The copy
    /// never releases the storage on behalf of the original. Implementations may refuse writes
    /// through the copy.
    fn clone_shared(&self) -> Self
    where
        Self: Sized;

    /// Releases this instance's hold on the physical storage. Calling it again is a no-op.
    fn close(&mut self) -> Result<(), Self::Error>;
}
