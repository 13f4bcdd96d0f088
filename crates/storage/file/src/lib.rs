//! The `file` crate is responsible for the interaction between the paging engine and the file system.
//! Its main logic centers around sealing pages before they are written to disk and opening them
//! again when they are read back.

pub mod api;

pub mod errors;

/// The unencrypted header at the start of every store file.
pub mod header;

/// Physical placement of page records inside a store file.
pub mod layout;

/// The actual disk based, per-page encrypted page file.
pub mod encrypted_page_file;

/// Plaintext page file kept in memory. Used by tests and hosts that do not need persistence.
pub mod in_memory_page_file;

mod positional_io;
