use thiserror::Error;

/// Failures of the envelope encryption layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Certificate has no private key; cannot decrypt")]
    MissingPrivateKey,
    #[error("Ciphertext is {actual} bytes, shorter than the {minimum} bytes of envelope overhead")]
    Truncated { actual: usize, minimum: usize },
    #[error("Decryption failed: wrong key, wrong associated data or corrupted ciphertext")]
    Decrypt,
    #[error("Encryption failed")]
    Encrypt,
    #[error("Key exchange produced a non-contributory shared secret")]
    NonContributory,
    #[error("Key derivation failed")]
    KeyDerivation,
    #[error("Expected {expected} bytes of key material, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}
