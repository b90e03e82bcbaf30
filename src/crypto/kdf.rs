//! # Key Derivation Functions
//!
//! Two derivation paths live here, one slow and one fast:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEY DERIVATION PATHS                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    WRAPPING KEY (slow)                          │   │
//! │  │                                                                 │   │
//! │  │  PBKDF2-HMAC-SHA256(                                           │   │
//! │  │    password   = user password,                                 │   │
//! │  │    salt       = 16 random bytes, stored with the record,      │   │
//! │  │    iterations = 310 000                                        │   │
//! │  │  )                                                             │   │
//! │  │                                                                 │   │
//! │  │  → 32-byte AES-256-GCM wrapping key                            │   │
//! │  │                                                                 │   │
//! │  │  Deliberately expensive: brute-forcing a stolen wrapped-key    │   │
//! │  │  record costs 310 000 HMAC invocations per guess.              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    MESSAGE KEY (fast)                           │   │
//! │  │                                                                 │   │
//! │  │  HKDF-SHA256(                                                  │   │
//! │  │    ikm  = X25519 shared output,                                │   │
//! │  │    info = "murmur-message-key-v1"                              │   │
//! │  │  )                                                             │   │
//! │  │                                                                 │   │
//! │  │  → 32-byte AES-256-GCM message key                             │   │
//! │  │                                                                 │   │
//! │  │  Symmetric: both peers feed the same DH output, so both        │   │
//! │  │  derive bit-identical keys.                                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths are deterministic: identical inputs always yield identical
//! keys. That determinism is what lets login recover the wrapping key
//! created at registration, and lets two peers agree on a message key
//! without transmitting it.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::encryption::{MessageKey, KEY_SIZE};
use crate::error::{Error, Result};

/// Size of the password salt in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Identifier of the only password-stretching algorithm this crate emits
pub const PBKDF2_ALGORITHM: &str = "PBKDF2-HMAC-SHA256";

/// Default PBKDF2 iteration count for new wrapped-key records
pub const PBKDF2_ITERATIONS: u32 = 310_000;

/// Lowest iteration count accepted when re-deriving from a stored record.
/// A record claiming fewer iterations has been tampered with or predates
/// any supported format.
pub const PBKDF2_MIN_ITERATIONS: u32 = 100_000;

/// Domain separation strings for HKDF
///
/// Keys derived for different purposes stay cryptographically independent
/// even when derived from the same input material.
pub mod domain {
    /// Domain for per-pair message encryption keys
    pub const MESSAGE_KEY: &[u8] = b"murmur-message-key-v1";
}

/// A random password salt, stored alongside the wrapped key it protects
///
/// Salts are drawn fresh from the OS secure RNG at registration, one per
/// wrapped record. A salt is never derived from the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "crate::codec::b64_array")] [u8; SALT_SIZE]);

impl Salt {
    /// Generate a fresh random salt
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Parameters of the password-stretching KDF, embedded in every wrapped
/// record so login can re-derive the exact same key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Name of the stretching algorithm
    pub algorithm: String,
    /// Iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// Validate that these parameters are ones this crate will run
    pub fn validate(&self) -> Result<()> {
        if self.algorithm != PBKDF2_ALGORITHM {
            return Err(Error::InvalidInput(format!(
                "unsupported KDF algorithm: {}",
                self.algorithm
            )));
        }
        if self.iterations < PBKDF2_MIN_ITERATIONS {
            return Err(Error::InvalidInput(format!(
                "iteration count {} below minimum {}",
                self.iterations, PBKDF2_MIN_ITERATIONS
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            algorithm: PBKDF2_ALGORITHM.to_string(),
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// A symmetric key-wrapping key derived from a password
///
/// Carries the salt and parameters it was derived with so the wrapped
/// record it produces is self-contained. Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct WrappingKey {
    key: [u8; KEY_SIZE],
    #[zeroize(skip)]
    salt: Salt,
    #[zeroize(skip)]
    params: KdfParams,
}

impl WrappingKey {
    /// The salt this key was derived with
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The KDF parameters this key was derived with
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Raw key bytes for the wrapping cipher
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Derive a key-wrapping key from a password and salt
///
/// Deterministic: identical (password, salt, params) always yields the
/// identical key. The password is only ever borrowed; it is not retained.
///
/// ## Errors
///
/// `InvalidInput` for an empty password or parameters outside the
/// supported range. The salt length is fixed by the type.
pub fn derive_wrapping_key(
    password: &str,
    salt: &Salt,
    params: &KdfParams,
) -> Result<WrappingKey> {
    if password.is_empty() {
        return Err(Error::InvalidInput("password must not be empty".into()));
    }
    params.validate()?;

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key,
    );

    Ok(WrappingKey {
        key,
        salt: salt.clone(),
        params: params.clone(),
    })
}

/// Derive a message key from a raw Diffie-Hellman output
///
/// Expands the 32-byte DH output through HKDF-SHA256 under a versioned
/// domain label. Symmetric by construction: both peers hold the same DH
/// output, so both derive the same key.
pub fn derive_message_key(dh_output: &[u8; KEY_SIZE]) -> Result<MessageKey> {
    let hkdf = Hkdf::<Sha256>::new(None, dh_output);

    let mut key = [0u8; KEY_SIZE];
    hkdf.expand(domain::MESSAGE_KEY, &mut key)
        .map_err(|_| Error::KeyDerivationFailed("HKDF expansion failed".into()))?;

    Ok(MessageKey::from_bytes(key))
}

/// Derive the pairwise message key for (our private, their public)
///
/// Performs the X25519 agreement (rejecting identity/low-order remote
/// points) and feeds the output through [`derive_message_key`]. The
/// intermediate DH output is wiped before returning.
pub fn derive_pair_key(
    local: &super::keys::KeyAgreementKeyPair,
    remote_public: &[u8; KEY_SIZE],
) -> Result<MessageKey> {
    let mut dh_output = local.diffie_hellman(remote_public)?;
    let key = derive_message_key(&dh_output);
    dh_output.zeroize();
    key
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyAgreementKeyPair;

    #[test]
    fn test_wrapping_key_deterministic() {
        let salt = Salt::from_bytes([7u8; SALT_SIZE]);
        let params = KdfParams::default();

        let k1 = derive_wrapping_key("correct horse battery staple", &salt, &params).unwrap();
        let k2 = derive_wrapping_key("correct horse battery staple", &salt, &params).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_different_passwords_different_keys() {
        let salt = Salt::from_bytes([7u8; SALT_SIZE]);
        let params = KdfParams::default();

        let k1 = derive_wrapping_key("password-one", &salt, &params).unwrap();
        let k2 = derive_wrapping_key("password-two", &salt, &params).unwrap();

        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_different_salts_different_keys() {
        let params = KdfParams::default();

        let k1 = derive_wrapping_key(
            "same password",
            &Salt::from_bytes([1u8; SALT_SIZE]),
            &params,
        )
        .unwrap();
        let k2 = derive_wrapping_key(
            "same password",
            &Salt::from_bytes([2u8; SALT_SIZE]),
            &params,
        )
        .unwrap();

        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let salt = Salt::random();
        let result = derive_wrapping_key("", &salt, &KdfParams::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_low_iteration_count_rejected() {
        let salt = Salt::random();
        let params = KdfParams {
            algorithm: PBKDF2_ALGORITHM.to_string(),
            iterations: 1000,
        };
        let result = derive_wrapping_key("password", &salt, &params);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let salt = Salt::random();
        let params = KdfParams {
            algorithm: "MD5".to_string(),
            iterations: PBKDF2_ITERATIONS,
        };
        let result = derive_wrapping_key("password", &salt, &params);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_message_key_deterministic() {
        let dh_output = [42u8; KEY_SIZE];

        let k1 = derive_message_key(&dh_output).unwrap();
        let k2 = derive_message_key(&dh_output).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_pair_key_symmetry() {
        let alice = KeyAgreementKeyPair::generate();
        let bob = KeyAgreementKeyPair::generate();

        let alice_key = derive_pair_key(&alice, &bob.public_bytes()).unwrap();
        let bob_key = derive_pair_key(&bob, &alice.public_bytes()).unwrap();

        assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
    }

    #[test]
    fn test_salt_serde_round_trip() {
        let salt = Salt::random();
        let json = serde_json::to_string(&salt).unwrap();
        let restored: Salt = serde_json::from_str(&json).unwrap();
        assert_eq!(salt, restored);
    }
}
