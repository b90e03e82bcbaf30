//! # Identity Module
//!
//! Account key lifecycle: registration, login, and the stored identity
//! record.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       IDENTITY KEY LIFECYCLE                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Registration                                                          │
//! │  ────────────                                                           │
//! │                                                                         │
//! │  1. Generate X25519 + Ed25519 key pairs (OS secure RNG)                │
//! │  2. Draw an independent 16-byte salt per pair                          │
//! │  3. PBKDF2(password, salt) → wrapping key, twice                       │
//! │  4. AES-256-GCM wrap each private half                                 │
//! │                                                                         │
//! │  → Identity { id, public keys, 2 wrapped records }  → durable store    │
//! │  → Session  { unwrapped KeySet }                    → volatile memory  │
//! │                                                                         │
//! │  Login                                                                 │
//! │  ─────                                                                  │
//! │                                                                         │
//! │  1. Fetch Identity record from the store                               │
//! │  2. Re-derive each wrapping key from the record's salt + params        │
//! │  3. Unwrap both private halves (wrong password → tag failure)          │
//! │  4. Check the rebuilt public keys match the stored ones                │
//! │                                                                         │
//! │  → Session { unwrapped KeySet }                                        │
//! │                                                                         │
//! │  Logout                                                                │
//! │  ──────                                                                 │
//! │                                                                         │
//! │  Session vault wiped; private keys exist nowhere unencrypted.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The password is only ever borrowed for the duration of a call and is
//! never stored. The wrapped records persist indefinitely; the unwrapped
//! keys live only inside the [`Session`].

mod session;

pub use session::Session;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{derive_wrapping_key, KdfParams, Salt};
use crate::crypto::keys::{KeySet, PublicKeys};
use crate::crypto::wrap::{unwrap_with_password, wrap, WrappedKeyRecord};
use crate::error::{Error, Result};

/// The stored shape of an account's key material
///
/// Public fields are shared broadly; the private halves appear only in
/// wrapped form and only ever materialize unwrapped inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account identifier
    pub id: String,
    /// Public halves of both key pairs
    pub public_keys: PublicKeys,
    /// Password-wrapped X25519 private key
    pub agreement_key: WrappedKeyRecord,
    /// Password-wrapped Ed25519 private key
    pub signing_key: WrappedKeyRecord,
    /// When the identity was created (Unix timestamp)
    pub created_at: i64,
}

impl Identity {
    /// Create a new identity protected by `password`
    ///
    /// Generates both key pairs, wraps each private half under its own
    /// independently-salted wrapping key, and returns the storable
    /// record together with an already-open [`Session`].
    ///
    /// ## Errors
    ///
    /// `InvalidInput` for an empty id or password. RNG failure surfaces
    /// as `KeyGenerationFailed` and should abort account creation.
    pub fn register(id: impl Into<String>, password: &str) -> Result<(Self, Session)> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidInput("identity id must not be empty".into()));
        }

        let keys = KeySet::generate();
        let params = KdfParams::default();

        // Independent salt per wrapped record; the two wrapping keys are
        // unrelated even though they stretch the same password.
        let agreement_wk = derive_wrapping_key(password, &Salt::random(), &params)?;
        let signing_wk = derive_wrapping_key(password, &Salt::random(), &params)?;

        let agreement_key = wrap(&keys.agreement.secret_bytes(), &agreement_wk)?;
        let signing_key = wrap(&keys.signing.secret_bytes(), &signing_wk)?;

        let identity = Self {
            id: id.clone(),
            public_keys: keys.public_keys(),
            agreement_key,
            signing_key,
            created_at: crate::time::now_timestamp(),
        };

        tracing::info!("Registered identity {}", id);

        Ok((identity, Session::new(id, keys)))
    }

    /// Unlock this identity's private keys with `password`
    ///
    /// Re-derives each wrapping key from the record's embedded salt and
    /// parameters, unwraps both private halves, and verifies that the
    /// rebuilt public keys match the stored ones.
    ///
    /// ## Errors
    ///
    /// `AuthenticationFailed` for a wrong password or tampered record —
    /// a wrong password can never produce a silently-wrong key, it fails
    /// tag verification. `InvalidKey` if the unwrapped material does not
    /// reproduce the stored public keys.
    pub fn login(&self, password: &str) -> Result<Session> {
        let agreement_secret = unwrap_with_password(&self.agreement_key, password)?;
        let signing_secret = unwrap_with_password(&self.signing_key, password)?;

        let keys = KeySet::from_bytes(&agreement_secret, &signing_secret);

        if keys.public_keys() != self.public_keys {
            return Err(Error::InvalidKey(
                "unwrapped private keys do not match stored public keys".into(),
            ));
        }

        tracing::info!("Identity {} logged in", self.id);

        Ok(Session::new(self.id.clone(), keys))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_produces_session_and_record() {
        let (identity, session) = Identity::register("alice", "pw-alice-123").unwrap();

        assert_eq!(identity.id, "alice");
        assert!(session.is_open());
        assert_eq!(session.public_keys().unwrap(), identity.public_keys);
    }

    #[test]
    fn test_register_rejects_empty_id() {
        assert!(matches!(
            Identity::register("", "pw"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_register_rejects_empty_password() {
        assert!(matches!(
            Identity::register("alice", ""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_independent_salts_per_record() {
        let (identity, _) = Identity::register("alice", "pw-alice-123").unwrap();
        assert_ne!(identity.agreement_key.salt, identity.signing_key.salt);
    }

    #[test]
    fn test_login_round_trip() {
        let (identity, session) = Identity::register("alice", "pw-alice-123").unwrap();
        session.logout();

        let restored = identity.login("pw-alice-123").unwrap();
        assert_eq!(restored.public_keys().unwrap(), identity.public_keys);
    }

    #[test]
    fn test_login_wrong_password_fails() {
        let (identity, _) = Identity::register("alice", "pw-alice-123").unwrap();

        let result = identity.login("pw-alice-124");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_login_tampered_record_fails() {
        let (identity, _) = Identity::register("alice", "pw-alice-123").unwrap();

        let mut tampered = identity.clone();
        tampered.agreement_key.ciphertext[0] ^= 0x01;

        let result = tampered.login("pw-alice-123");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_identity_serde_round_trip() {
        let (identity, _) = Identity::register("alice", "pw-alice-123").unwrap();

        let json = serde_json::to_string(&identity).unwrap();
        let restored: Identity = serde_json::from_str(&json).unwrap();

        assert_eq!(identity, restored);
        assert!(restored.login("pw-alice-123").is_ok());
    }
}
