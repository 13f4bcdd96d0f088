//! Small helpers for encoding fixed-width integers into on-disk byte layouts.
//!
//! Every multi-byte integer written by the storage crates goes through this crate, which keeps the
//! whole on-disk format little-endian.

pub mod bin_error;
pub mod conversions;
pub mod le;
