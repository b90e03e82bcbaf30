//! # Error Handling
//!
//! This module provides the error types for Murmur Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Generation Errors                                                 │
//! │  │   └── KeyGenerationFailed   - Secure RNG / platform failure         │
//! │  │                                                                      │
//! │  ├── Input Errors                                                      │
//! │  │   ├── InvalidInput          - Empty password, bad lengths, bad      │
//! │  │   │                           encodings                             │
//! │  │   └── InvalidKey            - Off-curve / identity-element /        │
//! │  │                               malformed public key                  │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── KeyDerivationFailed   - PBKDF2/HKDF internal failure          │
//! │  │   ├── EncryptionFailed      - Cipher setup/encrypt failure          │
//! │  │   ├── AuthenticationFailed  - Wrapped-key tag mismatch (wrong       │
//! │  │   │                           password or tampered record)          │
//! │  │   ├── DecryptionFailed      - Message tag mismatch                  │
//! │  │   └── SignatureMismatch     - Signature verification failed         │
//! │  │                                                                      │
//! │  ├── Session Errors                                                    │
//! │  │   └── SessionClosed         - Key vault already wiped               │
//! │  │                                                                      │
//! │  └── Boundary Errors                                                   │
//! │      ├── SerializationFailed   - Record could not be encoded           │
//! │      ├── DeserializationFailed - Record could not be decoded           │
//! │      └── NotFound              - Store / directory miss                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cryptographic failures are terminal for the operation that produced them:
//! nothing in this crate retries a failed unwrap, decrypt, or verify. Error
//! messages carry identifiers and lengths, never key material or plaintext.

use thiserror::Error;

/// Result type alias for Murmur Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Murmur Core
///
/// All errors are categorized by domain to make error handling clearer
/// and to give the surrounding application enough to decide user-facing
/// behavior (re-prompt, badge as unverifiable, drop).
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Generation Errors (100-199)
    // ========================================================================

    /// Secure random source failed; the calling flow should abort
    #[error("Key generation failed: secure random source unavailable")]
    KeyGenerationFailed,

    // ========================================================================
    // Input Errors (200-299)
    // ========================================================================

    /// Malformed or out-of-contract input (empty password, wrong-length
    /// salt/nonce/key bytes, bad text encoding)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A public key that cannot be used (off-curve, identity element,
    /// or malformed bytes)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Key derivation failed
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrapped-key authentication failed: wrong wrapping key or a
    /// tampered record. Never yields partial plaintext.
    #[error("Key unwrap failed: authentication tag mismatch")]
    AuthenticationFailed,

    /// Message decryption failed: tag verification rejected the
    /// ciphertext, nonce, or associated data
    #[error("Decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    /// Signature verification failed; the message must be treated as
    /// untrusted
    #[error("Signature verification failed")]
    SignatureMismatch,

    // ========================================================================
    // Session Errors (400-499)
    // ========================================================================

    /// The session's key vault has been wiped (logout or drop)
    #[error("Session closed: private keys have been wiped")]
    SessionClosed,

    // ========================================================================
    // Boundary Errors (500-599)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationFailed(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationFailed(String),

    /// Item not found in a store or directory
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Generation
    /// - 200-299: Input
    /// - 300-399: Crypto
    /// - 400-499: Session
    /// - 500-599: Boundary
    pub fn code(&self) -> i32 {
        match self {
            // Generation (100-199)
            Error::KeyGenerationFailed => 100,

            // Input (200-299)
            Error::InvalidInput(_) => 200,
            Error::InvalidKey(_) => 201,

            // Crypto (300-399)
            Error::KeyDerivationFailed(_) => 300,
            Error::EncryptionFailed(_) => 301,
            Error::AuthenticationFailed => 302,
            Error::DecryptionFailed => 303,
            Error::SignatureMismatch => 304,

            // Session (400-499)
            Error::SessionClosed => 400,

            // Boundary (500-599)
            Error::SerializationFailed(_) => 500,
            Error::DeserializationFailed(_) => 501,
            Error::NotFound(_) => 502,
        }
    }

    /// Check if this error can be resolved by user action
    ///
    /// A recoverable error means the caller may re-prompt and try again
    /// with different inputs. Retrying with the same inputs cannot succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::AuthenticationFailed | Error::NotFound(_)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
