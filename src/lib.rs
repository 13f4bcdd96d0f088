//! # pagevault
//!
//! Paged, encrypted, random-access byte store for search-index files.
//!
//! The store is composed of multiple internal components organized under
//! the `/crates` directory of this workspace:
//!
//! - `/storage/file`: on-disk format. Every page is sealed on its own and kept in a fixed-size
//!   slot behind a small plaintext header holding the logical length.
//! - `/storage/buffer`: the paging engine. Presents a page file as one seekable byte stream with
//!   a single resident page.
//! - `/storage/storage-api`: opens stores for reading or writing.
//! - `/crypto/envelope`: certificates and the envelope scheme pages are sealed with.
//!
//! ```no_run
//! use pagevault::{Certificate, IndexStorage, StoreOptions};
//! use std::sync::Arc;
//!
//! let storage = IndexStorage::new(StoreOptions::default(), Arc::new(Certificate::generate()));
//! let mut output = storage.open_output("index/_0.pvx")?;
//! output.write_bytes(b"term dictionary")?;
//! output.close()?;
//! # Ok::<(), pagevault::StoreError>(())
//! ```

pub use binary_helpers;
pub use buffer;
pub use envelope;
pub use file;
pub use storage_api;

pub use buffer::api::{IndexInput, IndexOutput};
pub use buffer::errors::PagingError;
pub use buffer::paged_stream::PagedStream;
pub use envelope::{Certificate, CryptoError, Envelope};
pub use file::api::PageFile;
pub use file::encrypted_page_file::{EncryptedPageFile, OpenMode};
pub use file::errors::{FileError, FormatError};
pub use file::layout::PageLayout;
pub use storage_api::index_storage::{EncryptedStream, IndexStorage, StoreError, StoreOptions};
