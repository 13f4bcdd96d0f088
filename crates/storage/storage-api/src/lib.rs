//! Entry point for hosts that need an encrypted, seekable byte store.
//!
//! [`index_storage::IndexStorage`] ties the pieces together: it opens an
//! [`file::encrypted_page_file::EncryptedPageFile`] with the configured page layout and
//! certificate, and wraps it into a [`buffer::paged_stream::PagedStream`] that implements the
//! [`buffer::api::IndexInput`] and [`buffer::api::IndexOutput`] capabilities.

pub mod index_storage;
