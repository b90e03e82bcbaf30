//! Session vault for unwrapped private keys.
//!
//! Unwrapped key material exists only inside a [`Session`], which is
//! created by registration or login and wiped by [`Session::logout`] or
//! drop. Every cryptographic operation that needs a private key goes
//! through the vault's lock, so no live key state is ever mutated
//! concurrently and nothing can read keys after the wipe.

use parking_lot::RwLock;

use crate::crypto::keys::{KeySet, PublicKeys};
use crate::crypto::signing::{sign, Signature};
use crate::crypto::{derive_pair_key, MessageKey};
use crate::error::{Error, Result};

/// An authenticated session holding the identity's unwrapped keys
///
/// ## Lifetime
///
/// The vault is populated exactly once (at construction) and emptied
/// exactly once (logout or drop). The private keys never outlive the
/// session: `KeySet` zeroizes its material when the vault releases it.
pub struct Session {
    /// Identifier of the identity this session belongs to
    id: String,
    /// Unwrapped key material; `None` after logout
    vault: RwLock<Option<KeySet>>,
}

impl Session {
    /// Create a session around freshly unwrapped keys
    pub(crate) fn new(id: String, keys: KeySet) -> Self {
        Self {
            id,
            vault: RwLock::new(Some(keys)),
        }
    }

    /// The identity this session is authenticated as
    pub fn identity_id(&self) -> &str {
        &self.id
    }

    /// Whether the vault still holds keys
    pub fn is_open(&self) -> bool {
        self.vault.read().is_some()
    }

    /// Public halves of the session's keys
    pub fn public_keys(&self) -> Result<PublicKeys> {
        let vault = self.vault.read();
        let keys = vault.as_ref().ok_or(Error::SessionClosed)?;
        Ok(keys.public_keys())
    }

    /// Derive the pairwise message key for a peer's public agreement key
    ///
    /// Recomputed on every call; the key is never cached or persisted.
    pub fn pair_key(&self, remote_agreement: &[u8; 32]) -> Result<MessageKey> {
        let vault = self.vault.read();
        let keys = vault.as_ref().ok_or(Error::SessionClosed)?;
        derive_pair_key(&keys.agreement, remote_agreement)
    }

    /// Sign bytes with the session's private signing key
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let vault = self.vault.read();
        let keys = vault.as_ref().ok_or(Error::SessionClosed)?;
        Ok(sign(&keys.signing, message))
    }

    /// Wipe the vault
    ///
    /// Drops the key set, which zeroizes the private key material. All
    /// subsequent operations fail with `SessionClosed`. Idempotent.
    pub fn logout(&self) {
        let mut vault = self.vault.write();
        if vault.take().is_some() {
            tracing::info!("Session for {} closed, private keys wiped", self.id);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // KeySet zeroizes on drop; nothing extra needed, but make the
        // wipe observable in logs like an explicit logout.
        if self.vault.get_mut().is_some() {
            tracing::debug!("Session for {} dropped with vault still open", self.id);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_operations_while_open() {
        let keys = KeySet::generate();
        let public = keys.public_keys();
        let session = Session::new("alice".into(), keys);

        assert!(session.is_open());
        assert_eq!(session.public_keys().unwrap(), public);
        assert!(session.sign(b"bytes").is_ok());
    }

    #[test]
    fn test_logout_wipes_vault() {
        let session = Session::new("alice".into(), KeySet::generate());
        let peer = KeySet::generate();

        session.logout();

        assert!(!session.is_open());
        assert!(matches!(session.public_keys(), Err(Error::SessionClosed)));
        assert!(matches!(session.sign(b"x"), Err(Error::SessionClosed)));
        assert!(matches!(
            session.pair_key(&peer.agreement.public_bytes()),
            Err(Error::SessionClosed)
        ));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let session = Session::new("alice".into(), KeySet::generate());
        session.logout();
        session.logout();
        assert!(!session.is_open());
    }

    #[test]
    fn test_pair_key_matches_between_sessions() {
        let alice_keys = KeySet::generate();
        let bob_keys = KeySet::generate();
        let alice_pub = alice_keys.public_keys();
        let bob_pub = bob_keys.public_keys();

        let alice = Session::new("alice".into(), alice_keys);
        let bob = Session::new("bob".into(), bob_keys);

        let k1 = alice.pair_key(&bob_pub.agreement).unwrap();
        let k2 = bob.pair_key(&alice_pub.agreement).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }
}
