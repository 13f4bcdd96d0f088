//! Envelope (public-key) encryption for individual storage pages.
//!
//! A [`Certificate`] is the cryptographic identity a store is opened with. Its public key seals
//! pages; its private key, when present, opens them. Callers that only need to write can be handed
//! a public-only certificate via [`Certificate::public_only`].
//!
//! The storage layer only depends on the [`Envelope`] trait, so a different scheme can be plugged
//! in as long as its [`Envelope::overhead`] fits in the page slot allowance.

mod certificate;
mod errors;

pub use certificate::{Certificate, KEY_SIZE, SEAL_OVERHEAD};
pub use errors::CryptoError;

/// Seals and opens self-contained ciphertext blobs.
pub trait Envelope {
    /// Encrypts `plaintext`, binding it to `aad`.
    fn seal(&self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts a blob produced by [`Envelope::seal`] with the same `aad`.
    fn open(&self, aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Number of bytes `seal` adds on top of the plaintext length. Constant per scheme.
    fn overhead(&self) -> usize;
}
