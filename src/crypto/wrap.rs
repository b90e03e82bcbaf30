//! # Key Wrapping
//!
//! Password-protected storage form for private key material.
//!
//! ## Record Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      WRAPPED KEY RECORD                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ciphertext   AES-256-GCM(wrapping_key, nonce, private_key_bytes)      │
//! │               48 bytes: 32-byte key + 16-byte auth tag                 │
//! │                                                                         │
//! │  nonce        12 random bytes, fresh per wrap call                     │
//! │                                                                         │
//! │  salt         16 random bytes the wrapping key was derived with        │
//! │                                                                         │
//! │  kdf          { algorithm, iterations } used for that derivation       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The record is self-contained: given only the record and the password,
//! login re-derives the wrapping key from the embedded salt and
//! parameters and unwraps. A wrong password produces a wrapping key that
//! fails tag verification — it can never yield a silently-wrong private
//! key.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce as AesNonce,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::encryption::{Nonce, KEY_SIZE, NONCE_SIZE};
use crate::crypto::kdf::{derive_wrapping_key, KdfParams, Salt, WrappingKey};
use crate::error::{Error, Result};

/// Domain tag bound into every wrap so a wrapped-key record cannot be
/// replayed as some other AES-GCM artifact of this crate
const WRAP_AAD: &[u8] = b"murmur-key-wrap-v1";

/// A private key encrypted under a password-derived wrapping key
///
/// Safe to persist and to transmit to the durable store; meaningless
/// without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKeyRecord {
    /// Encrypted private key bytes plus authentication tag
    #[serde(with = "crate::codec::b64")]
    pub ciphertext: Vec<u8>,
    /// Nonce the wrap was performed with (fresh per wrap)
    #[serde(with = "crate::codec::b64_array")]
    pub nonce: [u8; NONCE_SIZE],
    /// Salt the wrapping key was derived with
    pub salt: Salt,
    /// Password-stretching parameters for re-derivation at login
    pub kdf: KdfParams,
}

/// Wrap exported private key bytes under a wrapping key
///
/// Generates a fresh 96-bit nonce for this wrap. The record inherits the
/// wrapping key's salt and KDF parameters, making it self-contained.
pub fn wrap(secret: &[u8; KEY_SIZE], key: &WrappingKey) -> Result<WrappedKeyRecord> {
    let nonce = Nonce::random();
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("invalid wrapping key: {}", e)))?;

    let payload = Payload {
        msg: secret,
        aad: WRAP_AAD,
    };

    let ciphertext = cipher
        .encrypt(AesNonce::from_slice(nonce.as_bytes()), payload)
        .map_err(|e| Error::EncryptionFailed(format!("wrap failed: {}", e)))?;

    Ok(WrappedKeyRecord {
        ciphertext,
        nonce: *nonce.as_bytes(),
        salt: key.salt().clone(),
        kdf: key.params().clone(),
    })
}

/// Unwrap a record back into raw private key bytes
///
/// ## Errors
///
/// `AuthenticationFailed` if the wrapping key is wrong (wrong password)
/// or the record was tampered with — tag verification rejects both
/// before any plaintext is released. `InvalidInput` if the record
/// decrypts to something other than a 32-byte key.
pub fn unwrap(record: &WrappedKeyRecord, key: &WrappingKey) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| Error::EncryptionFailed(format!("invalid wrapping key: {}", e)))?;

    let payload = Payload {
        msg: record.ciphertext.as_slice(),
        aad: WRAP_AAD,
    };

    let plaintext = cipher
        .decrypt(AesNonce::from_slice(&record.nonce), payload)
        .map_err(|_| Error::AuthenticationFailed)?;

    let plaintext = Zeroizing::new(plaintext);
    if plaintext.len() != KEY_SIZE {
        return Err(Error::InvalidInput(format!(
            "unwrapped key has {} bytes, expected {}",
            plaintext.len(),
            KEY_SIZE
        )));
    }

    let mut secret = Zeroizing::new([0u8; KEY_SIZE]);
    secret.copy_from_slice(&plaintext);
    Ok(secret)
}

/// Unwrap a record using the password directly
///
/// Re-derives the wrapping key from the record's own salt and parameters
/// before unwrapping. This is the login path.
pub fn unwrap_with_password(
    record: &WrappedKeyRecord,
    password: &str,
) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let key = derive_wrapping_key(password, &record.salt, &record.kdf)?;
    unwrap(record, &key)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::SALT_SIZE;

    fn test_key(password: &str, salt_byte: u8) -> WrappingKey {
        derive_wrapping_key(
            password,
            &Salt::from_bytes([salt_byte; SALT_SIZE]),
            &KdfParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let key = test_key("hunter2hunter2", 1);
        let secret = [99u8; KEY_SIZE];

        let record = wrap(&secret, &key).unwrap();
        let unwrapped = unwrap(&record, &key).unwrap();

        assert_eq!(*unwrapped, secret);
    }

    #[test]
    fn test_record_carries_salt_and_params() {
        let key = test_key("hunter2hunter2", 3);
        let record = wrap(&[5u8; KEY_SIZE], &key).unwrap();

        assert_eq!(&record.salt, key.salt());
        assert_eq!(&record.kdf, key.params());
    }

    #[test]
    fn test_unwrap_with_password_round_trip() {
        let key = test_key("hunter2hunter2", 4);
        let secret = [17u8; KEY_SIZE];

        let record = wrap(&secret, &key).unwrap();
        let unwrapped = unwrap_with_password(&record, "hunter2hunter2").unwrap();

        assert_eq!(*unwrapped, secret);
    }

    #[test]
    fn test_wrong_password_fails_authentication() {
        let key = test_key("right password", 5);
        let record = wrap(&[1u8; KEY_SIZE], &key).unwrap();

        let result = unwrap_with_password(&record, "wrong password");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_record_fails_authentication() {
        let key = test_key("hunter2hunter2", 6);
        let record = wrap(&[1u8; KEY_SIZE], &key).unwrap();

        for i in 0..record.ciphertext.len() {
            let mut tampered = record.clone();
            tampered.ciphertext[i] ^= 0x01;
            let result = unwrap(&tampered, &key);
            assert!(matches!(result, Err(Error::AuthenticationFailed)));
        }
    }

    #[test]
    fn test_tampered_nonce_fails_authentication() {
        let key = test_key("hunter2hunter2", 7);
        let mut record = wrap(&[1u8; KEY_SIZE], &key).unwrap();
        record.nonce[0] ^= 0x01;

        let result = unwrap(&record, &key);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_fresh_nonce_per_wrap() {
        let key = test_key("hunter2hunter2", 8);
        let r1 = wrap(&[1u8; KEY_SIZE], &key).unwrap();
        let r2 = wrap(&[1u8; KEY_SIZE], &key).unwrap();

        assert_ne!(r1.nonce, r2.nonce);
        assert_ne!(r1.ciphertext, r2.ciphertext);
    }

    #[test]
    fn test_record_serde_round_trip() {
        let key = test_key("hunter2hunter2", 9);
        let record = wrap(&[2u8; KEY_SIZE], &key).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let restored: WrappedKeyRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, restored);
        let unwrapped = unwrap(&restored, &key).unwrap();
        assert_eq!(*unwrapped, [2u8; KEY_SIZE]);
    }
}
