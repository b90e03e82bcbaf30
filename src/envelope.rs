//! # Sealed Messages
//!
//! The wire-ready form of a protected message.
//!
//! ## Seal Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SEALING A MESSAGE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. Pair key                                                           │
//! │     our X25519 private × their X25519 public → HKDF → message key     │
//! │                                                                         │
//! │  2. Encrypt                                                            │
//! │     AES-256-GCM(key, fresh nonce, plaintext,                           │
//! │                 aad = sender_id | receiver_id)                         │
//! │                                                                         │
//! │  3. Sign                                                               │
//! │     Ed25519(signing key, canonical bytes of                            │
//! │             {id, sender, receiver, timestamp, nonce, ciphertext})      │
//! │                                                                         │
//! │  Output: SealedMessage — ready for the relay, no further transform     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Opening mirrors the flow: verify the signature first (before any
//! decryption work), then derive the same pair key and decrypt. A relay
//! that substitutes any field — ciphertext, nonce, ids, timestamp —
//! invalidates the signature.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::encryption::{decrypt, encrypt, Nonce, NONCE_SIZE};
use crate::crypto::keys::PublicKeys;
use crate::crypto::signing::{verify, Signature};
use crate::error::{Error, Result};
use crate::identity::Session;

/// A protected message as it travels through the relay and the store
///
/// The relay observes only this: opaque ciphertext plus routing ids.
/// Binary fields are text-encoded exactly once, here at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedMessage {
    /// Unique message ID
    pub id: String,
    /// Sender's account identifier
    pub sender_id: String,
    /// Receiver's account identifier
    pub receiver_id: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// AES-GCM nonce for this message
    #[serde(with = "crate::codec::b64_array")]
    pub nonce: [u8; NONCE_SIZE],
    /// Encrypted message body plus authentication tag
    #[serde(with = "crate::codec::b64")]
    pub ciphertext: Vec<u8>,
    /// Sender's Ed25519 signature over the canonical envelope bytes
    pub signature: Signature,
}

/// The portion of an envelope covered by the signature
///
/// Everything except the signature itself, serialized with bincode so
/// both sides produce identical bytes.
#[derive(Serialize)]
struct SealSignData<'a> {
    id: &'a str,
    sender_id: &'a str,
    receiver_id: &'a str,
    timestamp: i64,
    nonce: &'a [u8; NONCE_SIZE],
    ciphertext: &'a [u8],
}

impl SealedMessage {
    /// Seal a plaintext for a receiver
    ///
    /// Derives the pairwise key, encrypts with a fresh nonce, and signs
    /// the result with the session's signing key. The returned value
    /// needs no further transformation before relay.
    pub fn seal(
        session: &Session,
        receiver_id: &str,
        receiver_keys: &PublicKeys,
        plaintext: &[u8],
    ) -> Result<Self> {
        let sender_id = session.identity_id().to_string();
        let key = session.pair_key(&receiver_keys.agreement)?;

        let aad = build_aad(&sender_id, receiver_id);
        let (nonce, ciphertext) = encrypt(&key, plaintext, &aad)?;

        let id = Uuid::new_v4().to_string();
        let timestamp = crate::time::now_timestamp_millis();

        let sign_bytes = sign_bytes(&SealSignData {
            id: &id,
            sender_id: &sender_id,
            receiver_id,
            timestamp,
            nonce: nonce.as_bytes(),
            ciphertext: &ciphertext,
        })?;
        let signature = session.sign(&sign_bytes)?;

        tracing::debug!(
            "Sealed message {} for {} ({} ciphertext bytes)",
            id,
            receiver_id,
            ciphertext.len()
        );

        Ok(Self {
            id,
            sender_id,
            receiver_id: receiver_id.to_string(),
            timestamp,
            nonce: *nonce.as_bytes(),
            ciphertext,
            signature,
        })
    }

    /// Open a sealed message received from `sender_keys`' owner
    ///
    /// Verifies the signature against the sender's public signing key
    /// first; only then derives the pair key and decrypts. The sender's
    /// keys must come from the identity-key directory, not from the
    /// envelope itself.
    ///
    /// ## Errors
    ///
    /// `SignatureMismatch` if any envelope field was altered or the
    /// claimed sender did not sign it — the message must be treated as
    /// untrusted. `DecryptionFailed` if the ciphertext does not
    /// authenticate under the derived pair key (e.g. an impersonation
    /// attempt with mismatched key material).
    pub fn open(&self, session: &Session, sender_keys: &PublicKeys) -> Result<Vec<u8>> {
        if self.receiver_id != session.identity_id() {
            return Err(Error::InvalidInput(format!(
                "message addressed to {}, not to this session",
                self.receiver_id
            )));
        }

        let bytes = sign_bytes(&SealSignData {
            id: &self.id,
            sender_id: &self.sender_id,
            receiver_id: &self.receiver_id,
            timestamp: self.timestamp,
            nonce: &self.nonce,
            ciphertext: &self.ciphertext,
        })?;
        verify(&sender_keys.signing, &bytes, &self.signature)?;

        let key = session.pair_key(&sender_keys.agreement)?;
        let aad = build_aad(&self.sender_id, &self.receiver_id);

        decrypt(&key, &Nonce::from_bytes(self.nonce), &self.ciphertext, &aad)
    }

    /// Serialize to JSON for the relay
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON received from the relay
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::DeserializationFailed(e.to_string()))
    }
}

/// Canonical bytes covered by the envelope signature
fn sign_bytes(data: &SealSignData<'_>) -> Result<Vec<u8>> {
    bincode::serialize(data).map_err(|e| Error::SerializationFailed(e.to_string()))
}

/// Additional authenticated data binding a ciphertext to its endpoints
fn build_aad(sender_id: &str, receiver_id: &str) -> Vec<u8> {
    let mut aad = Vec::with_capacity(sender_id.len() + receiver_id.len() + 1);
    aad.extend_from_slice(sender_id.as_bytes());
    aad.push(b'|');
    aad.extend_from_slice(receiver_id.as_bytes());
    aad
}

// ============================================================================
// TESTS
// ============================================================================
