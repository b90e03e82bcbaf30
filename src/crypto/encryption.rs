//! # Message Encryption
//!
//! AES-256-GCM authenticated encryption for message bodies.
//!
//! ## Security Properties
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Only holders of the pair key can read the body |
//! | Integrity | Any modification is detected at decrypt time |
//! | Binding | AAD ties the ciphertext to sender/receiver identifiers |
//!
//! ## Nonce Discipline
//!
//! The single most damaging implementation error possible here is nonce
//! reuse under one key: it allows recovery of both the authentication key
//! and plaintext for that key. This module prevents it structurally —
//! [`encrypt`] draws a fresh random nonce internally on every call and no
//! public API accepts a caller-supplied nonce for encryption. Random
//! 96-bit nonces are safe for up to 2^32 messages per key (birthday
//! bound).

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce as AesNonce,
};
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the symmetric key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// A nonce (number used once) for AES-GCM encryption
///
/// Always generated internally during encryption; accepted from the
/// outside only on the decrypt path, where reuse is harmless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce(pub(crate) [u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a cryptographically random nonce
    pub(crate) fn random() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from existing bytes (decrypt path)
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// A pairwise AES-256-GCM message key
///
/// Derived on demand from the Diffie-Hellman shared output; never
/// persisted. Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct MessageKey([u8; KEY_SIZE]);

impl MessageKey {
    /// Create from raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Encrypt a message body under a pairwise key
///
/// Draws a fresh random nonce for this call and returns it alongside the
/// ciphertext (which includes the 16-byte authentication tag).
///
/// ## Parameters
///
/// - `key`: 256-bit pairwise message key
/// - `plaintext`: message body to encrypt
/// - `aad`: additional authenticated data (not encrypted, but bound to
///   the tag — any mismatch at decrypt time fails the whole operation)
pub fn encrypt(key: &MessageKey, plaintext: &[u8], aad: &[u8]) -> Result<(Nonce, Vec<u8>)> {
    let nonce = Nonce::random();
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {}", e)))?;

    let payload = Payload {
        msg: plaintext,
        aad,
    };

    let ciphertext = cipher
        .encrypt(AesNonce::from_slice(&nonce.0), payload)
        .map_err(|e| Error::EncryptionFailed(format!("encryption failed: {}", e)))?;

    Ok((nonce, ciphertext))
}

/// Decrypt a message body under a pairwise key
///
/// ## Errors
///
/// Returns `DecryptionFailed` if the ciphertext, nonce, or AAD was
/// altered in any way, or if the key is wrong. Decryption fails closed:
/// a tag mismatch never yields partial or corrupted plaintext.
pub fn decrypt(
    key: &MessageKey,
    nonce: &Nonce,
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {}", e)))?;

    let payload = Payload {
        msg: ciphertext,
        aad,
    };

    cipher
        .decrypt(AesNonce::from_slice(&nonce.0), payload)
        .map_err(|_| Error::DecryptionFailed)
}

// ============================================================================
// TESTS
// ============================================================================
