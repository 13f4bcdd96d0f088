//! X25519 certificate handle and the page sealing scheme built on it.
//!
//! Sealed blob layout:
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────────────┬──────────────┐
//! │ ephemeral public key (32 B)  │ ChaCha20 ciphertext (N B) │ Poly1305 tag │
//! │                              │                           │    (16 B)    │
//! └──────────────────────────────┴───────────────────────────┴──────────────┘
//! ```
//!
//! Every seal draws a fresh ephemeral key pair. The AEAD key is derived with HKDF-SHA256 from the
//! X25519 shared secret, salted with both public keys, so each key encrypts exactly one message and
//! the nonce can stay fixed.

use crate::errors::CryptoError;
use crate::Envelope;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, SharedSecret, StaticSecret};
use zeroize::Zeroizing;

/// Size in bytes of X25519 public and private keys.
pub const KEY_SIZE: usize = 32;

/// Size of the Poly1305 authentication tag.
const TAG_SIZE: usize = 16;

/// Bytes added by [`Certificate::seal`] on top of the plaintext length.
pub const SEAL_OVERHEAD: usize = KEY_SIZE + TAG_SIZE;

const KDF_INFO: &[u8] = b"pagevault page key v1";

// Single-use keys make a constant nonce safe.
const NONCE: [u8; 12] = [0u8; 12];

/// Cryptographic identity of a store: a public key, plus the private key when the holder may
/// decrypt.
#[derive(Clone)]
pub struct Certificate {
    public: PublicKey,
    secret: Option<StaticSecret>,
}

impl Certificate {
    /// Generates a fresh key pair from the operating system RNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        Self {
            public: PublicKey::from(&secret),
            secret: Some(secret),
        }
    }

    /// Builds a full certificate (able to decrypt) from raw private key bytes.
    pub fn from_secret_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        let secret = StaticSecret::from(bytes);
        Self {
            public: PublicKey::from(&secret),
            secret: Some(secret),
        }
    }

    /// Builds an encrypt-only certificate from raw public key bytes.
    pub fn from_public_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self {
            public: PublicKey::from(bytes),
            secret: None,
        }
    }

    /// Same as [`Certificate::from_secret_bytes`], for key material of unchecked length (key files).
    pub fn secret_from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = Zeroizing::new(Self::key_array(bytes)?);
        Ok(Self::from_secret_bytes(*key))
    }

    /// Same as [`Certificate::from_public_bytes`], for key material of unchecked length.
    pub fn public_from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self::from_public_bytes(Self::key_array(bytes)?))
    }

    /// Returns a copy of this certificate stripped of its private key.
    pub fn public_only(&self) -> Self {
        Self {
            public: self.public,
            secret: None,
        }
    }

    pub fn has_private_key(&self) -> bool {
        self.secret.is_some()
    }

    pub fn public_key_bytes(&self) -> [u8; KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Private key bytes, wiped from memory when the returned value is dropped.
    pub fn secret_key_bytes(&self) -> Option<Zeroizing<[u8; KEY_SIZE]>> {
        self.secret.as_ref().map(|s| Zeroizing::new(s.to_bytes()))
    }

    /// Short hex identifier of the public key, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.public.as_bytes());
        digest[..8].iter().map(|b| format!("{b:02x}")).collect()
    }

    fn key_array(bytes: &[u8]) -> Result<[u8; KEY_SIZE], CryptoError> {
        bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })
    }

    fn cipher(
        shared: &SharedSecret,
        ephemeral: &PublicKey,
        recipient: &PublicKey,
    ) -> Result<ChaCha20Poly1305, CryptoError> {
        if !shared.was_contributory() {
            return Err(CryptoError::NonContributory);
        }

        let mut salt = [0u8; 2 * KEY_SIZE];
        salt[..KEY_SIZE].copy_from_slice(ephemeral.as_bytes());
        salt[KEY_SIZE..].copy_from_slice(recipient.as_bytes());

        let hk = Hkdf::<Sha256>::new(Some(&salt), shared.as_bytes());
        let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
        hk.expand(KDF_INFO, &mut okm[..])
            .map_err(|_| CryptoError::KeyDerivation)?;

        Ok(ChaCha20Poly1305::new(Key::from_slice(&okm[..])))
    }
}

impl Envelope for Certificate {
    fn seal(&self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.public);
        let cipher = Self::cipher(&shared, &ephemeral_public, &self.public)?;

        let sealed = cipher
            .encrypt(
                Nonce::from_slice(&NONCE),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::Encrypt)?;

        let mut out = Vec::with_capacity(KEY_SIZE + sealed.len());
        out.extend_from_slice(ephemeral_public.as_bytes());
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn open(&self, aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let secret = self.secret.as_ref().ok_or(CryptoError::MissingPrivateKey)?;

        if ciphertext.len() < SEAL_OVERHEAD {
            return Err(CryptoError::Truncated {
                actual: ciphertext.len(),
                minimum: SEAL_OVERHEAD,
            });
        }

        let (ephemeral_bytes, body) = ciphertext.split_at(KEY_SIZE);
        let ephemeral_public = PublicKey::from(Self::key_array(ephemeral_bytes)?);
        let shared = secret.diffie_hellman(&ephemeral_public);
        let cipher = Self::cipher(&shared, &ephemeral_public, &self.public)?;

        cipher
            .decrypt(Nonce::from_slice(&NONCE), Payload { msg: body, aad })
            .map_err(|_| CryptoError::Decrypt)
    }

    fn overhead(&self) -> usize {
        SEAL_OVERHEAD
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("fingerprint", &self.fingerprint())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}
