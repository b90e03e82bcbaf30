//! # Digital Signatures
//!
//! Ed25519 signatures binding a sender's identity to the exact
//! ciphertext they transmitted.
//!
//! ## Security Properties
//!
//! | Property | Description |
//! |----------|-------------|
//! | Authenticity | Verifies the ciphertext came from the claimed sender |
//! | Integrity | Detects any modification to the signed bytes |
//! | Binding | Signing the ciphertext means a relay cannot substitute a different payload under the same sender |
//!
//! Signatures cover ciphertext, never plaintext: verification is
//! possible (and is performed) before any decryption work happens, and
//! the signature leaks nothing about the message body.
//!
//! Verification failure is non-fatal to the system but terminal for the
//! message — callers must surface it as untrusted, never render it as
//! verified.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::crypto::keys::SigningKeyPair;
use crate::error::{Error, Result};

/// Size of an Ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// An Ed25519 digital signature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_bytes")] pub [u8; SIGNATURE_SIZE]);

impl Signature {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidInput(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                slice.len()
            )));
        }
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidInput(format!("invalid signature hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a byte sequence with the sender's signing key
///
/// Ed25519 signatures are deterministic: signing the same bytes with the
/// same key always produces the same signature.
pub fn sign(keypair: &SigningKeyPair, message: &[u8]) -> Signature {
    let sig = keypair.signing_key().sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against the sender's public signing key
///
/// ## Returns
///
/// `Ok(())` if valid, `Err(SignatureMismatch)` if the bytes were altered
/// after signing or a different key pair produced the signature.
pub fn verify(public_key: &[u8; 32], message: &[u8], signature: &Signature) -> Result<()> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| Error::InvalidKey(format!("invalid public key: {}", e)))?;

    let sig = Ed25519Signature::from_bytes(&signature.0);

    verifying_key
        .verify(message, &sig)
        .map_err(|_| Error::SignatureMismatch)
}

/// Serde helper for signature bytes
mod signature_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 64], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid signature length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = SigningKeyPair::generate();
        let message = b"ciphertext bytes";

        let signature = sign(&keypair, message);
        let result = verify(&keypair.public_bytes(), message, &signature);

        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_altered_message_fails() {
        let keypair = SigningKeyPair::generate();

        let signature = sign(&keypair, b"ciphertext bytes");
        let result = verify(&keypair.public_bytes(), b"different bytes", &signature);

        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_verify_substituted_key_fails() {
        let keypair1 = SigningKeyPair::generate();
        let keypair2 = SigningKeyPair::generate();
        let message = b"ciphertext bytes";

        let signature = sign(&keypair1, message);
        let result = verify(&keypair2.public_bytes(), message, &signature);

        assert!(matches!(result, Err(Error::SignatureMismatch)));
    }

    #[test]
    fn test_deterministic_signatures() {
        let keypair = SigningKeyPair::generate();
        let message = b"ciphertext bytes";

        let sig1 = sign(&keypair, message);
        let sig2 = sign(&keypair, message);

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_signature_serialization() {
        let keypair = SigningKeyPair::generate();
        let signature = sign(&keypair, b"test");

        let json = serde_json::to_string(&signature).unwrap();
        let restored: Signature = serde_json::from_str(&json).unwrap();

        assert_eq!(signature, restored);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(Signature::from_slice(&[0u8; 63]).is_err());
        assert!(Signature::from_slice(&[0u8; 65]).is_err());
        assert!(Signature::from_slice(&[0u8; 64]).is_ok());
    }
}
