//! The index storage
use buffer::errors::PagingError;
use buffer::paged_stream::PagedStream;
use envelope::Certificate;
use file::encrypted_page_file::{EncryptedPageFile, OpenMode};
use file::errors::FileError;
use file::layout::{DEFAULT_SLOT_ALLOWANCE, PageLayout};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Default number of bytes per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(4096).unwrap();

/// Stream over an encrypted store file. Implements both the read and the write capability.
pub type EncryptedStream = PagedStream<EncryptedPageFile<Certificate>>;

pub type StoreError = PagingError<FileError>;

/// Page geometry of the stores opened by an [`IndexStorage`]. Both values are part of the file
/// format and must not change for an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub page_size: NonZeroUsize,
    pub slot_allowance: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            slot_allowance: DEFAULT_SLOT_ALLOWANCE,
        }
    }
}

impl StoreOptions {
    pub fn layout(&self) -> PageLayout {
        PageLayout::new(self.page_size, self.slot_allowance)
    }
}

/// Opens encrypted stores with one page layout and one certificate.
#[derive(Debug, Clone)]
pub struct IndexStorage {
    options: StoreOptions,
    certificate: Arc<Certificate>,
}

impl IndexStorage {
    /// Creates a new instance of the `IndexStorage`
    pub fn new(options: StoreOptions, certificate: Arc<Certificate>) -> Self {
        Self {
            options,
            certificate,
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn certificate(&self) -> &Arc<Certificate> {
        &self.certificate
    }

    /// Opens an existing store for reading. Requires a certificate with a private key as soon
    /// as a non-empty page is read.
    pub fn open_input(&self, path: impl AsRef<Path>) -> Result<EncryptedStream, StoreError> {
        self.open(path.as_ref(), OpenMode::Read)
    }

    /// Opens a store for reading and writing, creating the file if needed. Positioned at 0.
    pub fn open_output(&self, path: impl AsRef<Path>) -> Result<EncryptedStream, StoreError> {
        self.open(path.as_ref(), OpenMode::ReadWrite)
    }

    fn open(&self, path: &Path, mode: OpenMode) -> Result<EncryptedStream, StoreError> {
        let file = EncryptedPageFile::open(
            path,
            mode,
            Arc::clone(&self.certificate),
            self.options.layout(),
        )?;
        let stream = PagedStream::open(file, self.options.page_size)?;
        info!(
            path = %path.display(),
            ?mode,
            length = stream.length(),
            certificate = %self.certificate.fingerprint(),
            "store opened"
        );
        Ok(stream)
    }
}
