//! # Boundary Interfaces
//!
//! Contracts between this core and the excluded surrounding system: the
//! durable store, the identity-key directory, and the request payloads
//! arriving from clients.
//!
//! The core never trusts a public key it has not fetched through the
//! [`KeyDirectory`], and request payloads are tagged variants validated
//! before any field is read — there is no dynamically-typed payload
//! assembled per flow.
//!
//! [`MemoryStore`] is the in-memory implementation used by tests and
//! demos; production backends live outside this crate and only need to
//! satisfy the traits.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::crypto::keys::PublicKeys;
use crate::crypto::wrap::WrappedKeyRecord;
use crate::envelope::SealedMessage;
use crate::error::{Error, Result};
use crate::identity::Identity;

/// Read/write access to stored identity records
pub trait IdentityStore {
    /// Persist an identity record
    fn put_identity(&self, identity: &Identity) -> Result<()>;
    /// Fetch an identity record by account id
    fn get_identity(&self, id: &str) -> Result<Identity>;
}

/// Read/write access to relayed message records
pub trait MessageStore {
    /// Persist a sealed message
    fn put_message(&self, message: &SealedMessage) -> Result<()>;
    /// Fetch every message exchanged between two accounts, oldest first
    fn messages_between(&self, a: &str, b: &str) -> Result<Vec<SealedMessage>>;
}

/// Lookup service for peers' public keys
///
/// This is the only channel the core accepts public keys from. Results
/// are not cached beyond single-operation scope unless the caller opts
/// in.
pub trait KeyDirectory {
    /// Fetch the public keys published for an account
    fn lookup(&self, id: &str) -> Result<PublicKeys>;
}

/// In-memory store backing tests and demos
#[derive(Default)]
pub struct MemoryStore {
    identities: RwLock<HashMap<String, Identity>>,
    messages: RwLock<Vec<SealedMessage>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryStore {
    fn put_identity(&self, identity: &Identity) -> Result<()> {
        self.identities
            .write()
            .insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    fn get_identity(&self, id: &str) -> Result<Identity> {
        self.identities
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("identity {}", id)))
    }
}

impl MessageStore for MemoryStore {
    fn put_message(&self, message: &SealedMessage) -> Result<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    fn messages_between(&self, a: &str, b: &str) -> Result<Vec<SealedMessage>> {
        let mut matching: Vec<SealedMessage> = self
            .messages
            .read()
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b)
                    || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect();
        matching.sort_by_key(|m| m.timestamp);
        Ok(matching)
    }
}

impl KeyDirectory for MemoryStore {
    fn lookup(&self, id: &str) -> Result<PublicKeys> {
        Ok(self.get_identity(id)?.public_keys)
    }
}

/// A request arriving from a client, one tagged variant per flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// Publish a freshly registered identity
    Register(RegistrationRequest),
    /// Unlock an existing identity
    Login(LoginRequest),
}

impl ClientRequest {
    /// Validate the variant before any field is acted on
    pub fn validate(&self) -> Result<()> {
        match self {
            ClientRequest::Register(r) => r.validate(),
            ClientRequest::Login(r) => r.validate(),
        }
    }
}

/// Payload of a registration flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Account identifier being registered
    pub id: String,
    /// Public halves of both key pairs
    pub public_keys: PublicKeys,
    /// Wrapped X25519 private key
    pub agreement_wrapped: WrappedKeyRecord,
    /// Wrapped Ed25519 private key
    pub signing_wrapped: WrappedKeyRecord,
}

impl RegistrationRequest {
    /// Build the request from a registered identity record
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            public_keys: identity.public_keys.clone(),
            agreement_wrapped: identity.agreement_key.clone(),
            signing_wrapped: identity.signing_key.clone(),
        }
    }

    /// Check structural validity before acting on any field
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidInput("registration id must not be empty".into()));
        }
        self.agreement_wrapped.kdf.validate()?;
        self.signing_wrapped.kdf.validate()?;
        Ok(())
    }
}

/// Payload of a login flow
///
/// Carries the password only for the duration of the request; nothing
/// in this crate retains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account identifier logging in
    pub id: String,
    /// The account password, used once to derive the wrapping keys
    pub password: String,
}

impl LoginRequest {
    /// Check structural validity before acting on any field
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidInput("login id must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidInput("login password must not be empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
