/// Read capability over a store.
///
/// Cursor-moving operations take `&mut self`; a reader that needs to be used from several places
/// at once is duplicated with [`IndexInput::clone_input`] instead of being shared.
pub trait IndexInput {
    type Error: std::error::Error;

    /// Logical length of the stream in bytes.
    fn length(&self) -> u64;

    /// Current cursor position.
    fn position(&self) -> u64;

    /// Reads the byte at the cursor and advances it by one.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Fills `destination` from the cursor onwards and advances the cursor past it.
    fn read_bytes(&mut self, destination: &mut [u8]) -> Result<(), Self::Error>;

    /// Moves the cursor to `position`.
    fn seek(&mut self, position: u64) -> Result<(), Self::Error>;

    /// Independent reader over the same store, starting at this reader's position.
    fn clone_input(&self) -> Self
    where
        Self: Sized;
}

/// Write capability over a store.
pub trait IndexOutput {
    type Error: std::error::Error;

    fn length(&self) -> u64;

    fn position(&self) -> u64;

    /// Writes `byte` at the cursor, extending the stream if the cursor is at its end.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Writes all of `source` starting at the cursor.
    fn write_bytes(&mut self, source: &[u8]) -> Result<(), Self::Error>;

    fn seek(&mut self, position: u64) -> Result<(), Self::Error>;

    /// Persists buffered writes.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
