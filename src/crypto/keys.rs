//! # Key Management
//!
//! Long-term asymmetric key material for one identity.
//!
//! ## Key Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SigningKeyPair (Ed25519)                                       │   │
//! │  │  ─────────────────────────                                       │   │
//! │  │                                                                  │   │
//! │  │  Purpose:                                                       │   │
//! │  │  • Signing outbound ciphertexts                                 │   │
//! │  │  • Verifying authenticity of received messages                  │   │
//! │  │                                                                  │   │
//! │  │  Format:                                                        │   │
//! │  │  • Private key: 32 bytes (kept secret, zeroized on drop)       │   │
//! │  │  • Public key: 32 bytes (shared freely)                        │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  KeyAgreementKeyPair (X25519)                                   │   │
//! │  │  ────────────────────────────                                    │   │
//! │  │                                                                  │   │
//! │  │  Purpose:                                                       │   │
//! │  │  • Pairwise shared-secret derivation (ECDH)                     │   │
//! │  │  • Never used for signing                                       │   │
//! │  │                                                                  │   │
//! │  │  Format:                                                        │   │
//! │  │  • Private key: 32 bytes (kept secret, zeroized on drop)       │   │
//! │  │  • Public key: 32 bytes (published to the directory)           │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two pairs share a curve family but have disjoint roles: compromise
//! of the signing key must not compromise confidentiality, and vice versa.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// Complete key material for one identity
///
/// ## Security
///
/// - Private halves are zeroized when this struct is dropped
/// - Public halves can be safely shared with anyone
/// - Both pairs are generated independently from the OS secure RNG
#[derive(ZeroizeOnDrop)]
pub struct KeySet {
    /// X25519 keypair for shared-secret derivation
    pub agreement: KeyAgreementKeyPair,
    /// Ed25519 keypair for signing
    pub signing: SigningKeyPair,
}

impl KeySet {
    /// Generate a fresh key set from the OS secure random source
    pub fn generate() -> Self {
        Self {
            agreement: KeyAgreementKeyPair::generate(),
            signing: SigningKeyPair::generate(),
        }
    }

    /// Rebuild a key set from exported private key bytes
    pub fn from_bytes(agreement: &[u8; 32], signing: &[u8; 32]) -> Self {
        Self {
            agreement: KeyAgreementKeyPair::from_bytes(agreement),
            signing: SigningKeyPair::from_bytes(signing),
        }
    }

    /// Get the public keys for publication
    pub fn public_keys(&self) -> PublicKeys {
        PublicKeys {
            agreement: self.agreement.public_bytes(),
            signing: self.signing.public_bytes(),
        }
    }
}

/// X25519 keypair for pairwise shared-secret derivation
#[derive(ZeroizeOnDrop)]
pub struct KeyAgreementKeyPair {
    /// Private scalar (secret)
    #[zeroize(skip)] // x25519_dalek handles its own zeroization
    secret: StaticSecret,
    /// Public point (derived from secret)
    public: X25519PublicKey,
}

impl KeyAgreementKeyPair {
    /// Generate a new random key-agreement keypair
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Create from raw private key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let secret = StaticSecret::from(*bytes);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Get the secret key bytes (for wrapping only)
    ///
    /// ## Security Warning
    ///
    /// Only use this to feed the key wrapper. Never log or transmit
    /// these bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    /// Perform Diffie-Hellman key agreement with a remote public key
    ///
    /// Both parties compute the same output:
    /// - Alice: alice_secret × bob_public
    /// - Bob: bob_secret × alice_public
    ///
    /// A remote public key that is the identity element or another
    /// low-order point would force the output regardless of our secret;
    /// such keys are rejected with `InvalidKey` before the output is
    /// released.
    pub fn diffie_hellman(&self, their_public: &[u8; 32]) -> Result<[u8; 32]> {
        let their_public = X25519PublicKey::from(*their_public);
        let shared = self.secret.diffie_hellman(&their_public);
        if !shared.was_contributory() {
            return Err(Error::InvalidKey(
                "remote public key is a low-order or identity point".into(),
            ));
        }
        Ok(shared.to_bytes())
    }
}

/// Ed25519 signing keypair
#[derive(ZeroizeOnDrop)]
pub struct SigningKeyPair {
    /// Private signing key (secret)
    #[zeroize(skip)] // ed25519_dalek::SigningKey handles its own zeroization
    secret: SigningKey,
}

impl SigningKeyPair {
    /// Generate a new random signing keypair
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut OsRng);
        Self { secret }
    }

    /// Create from raw private key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let secret = SigningKey::from_bytes(bytes);
        Self { secret }
    }

    /// Get the secret key bytes (for wrapping only)
    ///
    /// ## Security Warning
    ///
    /// Only use this to feed the key wrapper. Never log or transmit
    /// these bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; 32] {
        self.secret.verifying_key().to_bytes()
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> VerifyingKey {
        self.secret.verifying_key()
    }

    /// Get reference to the signing key
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.secret
    }
}

/// Public keys that can be safely shared with others
///
/// This contains only public information and can be serialized,
/// transmitted, and stored without security concerns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKeys {
    /// X25519 public key for shared-secret derivation (32 bytes)
    #[serde(with = "hex_bytes")]
    pub agreement: [u8; 32],

    /// Ed25519 public key for signature verification (32 bytes)
    #[serde(with = "hex_bytes")]
    pub signing: [u8; 32],
}

impl PublicKeys {
    /// Create from raw bytes
    pub fn from_bytes(agreement: [u8; 32], signing: [u8; 32]) -> Self {
        Self { agreement, signing }
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.signing)
            .map_err(|e| Error::InvalidKey(format!("invalid signing public key: {}", e)))
    }

    /// Encode as hex string (for display/QR codes)
    pub fn to_hex(&self) -> String {
        format!("{}{}", hex::encode(self.agreement), hex::encode(self.signing))
    }

    /// Decode from hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != 128 {
            return Err(Error::InvalidKey(
                "public key hex must be 128 characters".into(),
            ));
        }

        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidKey(format!("invalid hex: {}", e)))?;

        let agreement: [u8; 32] = bytes[0..32]
            .try_into()
            .map_err(|_| Error::InvalidKey("invalid agreement key length".into()))?;

        let signing: [u8; 32] = bytes[32..64]
            .try_into()
            .map_err(|_| Error::InvalidKey("invalid signing key length".into()))?;

        Ok(Self { agreement, signing })
    }
}

/// Serde helper for serializing byte arrays as hex
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("Invalid length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyset_generation() {
        let ks1 = KeySet::generate();
        let ks2 = KeySet::generate();

        // Keys should be different
        assert_ne!(ks1.agreement.public_bytes(), ks2.agreement.public_bytes());
        assert_ne!(ks1.signing.public_bytes(), ks2.signing.public_bytes());
    }

    #[test]
    fn test_roles_are_disjoint() {
        let ks = KeySet::generate();
        assert_ne!(ks.agreement.public_bytes(), ks.signing.public_bytes());
    }

    #[test]
    fn test_keyset_from_bytes_round_trip() {
        let ks = KeySet::generate();
        let rebuilt = KeySet::from_bytes(
            &ks.agreement.secret_bytes(),
            &ks.signing.secret_bytes(),
        );

        assert_eq!(ks.agreement.public_bytes(), rebuilt.agreement.public_bytes());
        assert_eq!(ks.signing.public_bytes(), rebuilt.signing.public_bytes());
    }

    #[test]
    fn test_diffie_hellman_symmetry() {
        let alice = KeyAgreementKeyPair::generate();
        let bob = KeyAgreementKeyPair::generate();

        // Both parties should derive the same shared output
        let alice_shared = alice.diffie_hellman(&bob.public_bytes()).unwrap();
        let bob_shared = bob.diffie_hellman(&alice.public_bytes()).unwrap();

        assert_eq!(alice_shared, bob_shared);
    }

    #[test]
    fn test_diffie_hellman_rejects_identity_point() {
        let alice = KeyAgreementKeyPair::generate();

        // The all-zero encoding is the identity element of the curve group
        let result = alice.diffie_hellman(&[0u8; 32]);
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_public_keys_serialization() {
        let ks = KeySet::generate();
        let public = ks.public_keys();

        let json = serde_json::to_string(&public).unwrap();
        let restored: PublicKeys = serde_json::from_str(&json).unwrap();

        assert_eq!(public, restored);
    }

    #[test]
    fn test_public_keys_hex() {
        let ks = KeySet::generate();
        let public = ks.public_keys();

        let hex = public.to_hex();
        let restored = PublicKeys::from_hex(&hex).unwrap();

        assert_eq!(public, restored);
    }
}
