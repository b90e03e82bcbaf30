//! # Cryptography Module
//!
//! All cryptographic primitives used by Murmur Core.
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | X25519 | Key agreement | Fast ECDH, small keys, misuse-resistant |
//! | Ed25519 | Signing | Fast, deterministic, widely audited |
//! | AES-256-GCM | Messages + key wrapping | AEAD, fails closed on tampering |
//! | PBKDF2-HMAC-SHA256 | Password stretching | Salted, deliberately slow |
//! | HKDF-SHA256 | Message-key derivation | Industry standard, well-analyzed |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: All secret keys are zeroized when dropped
//! 2. **Constant-Time Operations**: Using dalek for constant-time crypto
//! 3. **Secure Random**: Using `rand::rngs::OsRng` for all randomness
//! 4. **No Nonce Reuse**: Fresh nonce drawn internally for every encrypt
//!    and wrap; no API accepts a caller-supplied encryption nonce
//! 5. **Role Separation**: The key-agreement pair and the signing pair
//!    are independent — compromise of one does not compromise the other
//!
//! All operations here are pure functions of their inputs plus the OS
//! random source: no shared mutable state, safe to call concurrently.

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod signing;
pub mod wrap;

pub use encryption::{decrypt, encrypt, MessageKey, Nonce, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use kdf::{
    derive_message_key, derive_pair_key, derive_wrapping_key, KdfParams, Salt, WrappingKey,
    PBKDF2_ITERATIONS, SALT_SIZE,
};
pub use keys::{KeyAgreementKeyPair, KeySet, PublicKeys, SigningKeyPair};
pub use signing::{sign, verify, Signature, SIGNATURE_SIZE};
pub use wrap::{unwrap, unwrap_with_password, wrap, WrappedKeyRecord};
