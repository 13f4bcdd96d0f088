//! Paging layer of the storage system.
//!
//! [`paged_stream::PagedStream`] presents a flat, seekable byte stream on top of any
//! [`file::api::PageFile`], keeping exactly one page resident in memory.

/// Capability traits handed to the consumer of a store.
pub mod api;
pub mod errors;
pub mod paged_stream;
mod std_io;
