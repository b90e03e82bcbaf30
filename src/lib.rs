//! # Murmur Core
//!
//! Client-side key management and message protection for a two-party
//! chat system whose server is a dumb relay and durable store. The
//! relay only ever observes opaque ciphertext; everything that matters
//! happens on the endpoints, in this crate.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MURMUR CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────────────┐    │
//! │  │  Identity   │  │  Envelope   │  │          Boundary            │    │
//! │  │             │  │             │  │                              │    │
//! │  │ - Register  │  │ - Seal      │  │ - IdentityStore / Message-   │    │
//! │  │ - Login     │  │ - Open      │  │   Store / KeyDirectory       │    │
//! │  │ - Session   │  │ - Wire JSON │  │ - Tagged client requests     │    │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────────┬───────────────┘    │
//! │         │                │                        │                    │
//! │         └────────────────┴────────────────────────┘                    │
//! │                                   │                                     │
//! │  ┌────────────────────────────────┴────────────────────────────────┐   │
//! │  │                            Crypto                               │   │
//! │  │                                                                 │   │
//! │  │  keys        X25519 + Ed25519 pairs, disjoint roles            │   │
//! │  │  kdf         PBKDF2 password stretching, HKDF message keys     │   │
//! │  │  wrap        AES-256-GCM wrapped private-key records           │   │
//! │  │  encryption  AES-256-GCM message bodies, fresh nonce per call  │   │
//! │  │  signing     Ed25519 over the exact transmitted ciphertext     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SECURITY LAYERS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Layer 1: Keys at Rest (PBKDF2 + AES-256-GCM)                          │
//! │  ────────────────────────────────────────────                           │
//! │  Private keys are stored only in password-wrapped form. A wrong        │
//! │  password fails tag verification; it can never produce a              │
//! │  silently-wrong key.                                                   │
//! │                                                                         │
//! │  Layer 2: Message Confidentiality (X25519 + HKDF + AES-256-GCM)        │
//! │  ──────────────────────────────────────────────────────────────         │
//! │  Every message is encrypted under a pairwise key both peers           │
//! │  derive independently and never transmit.                             │
//! │                                                                         │
//! │  Layer 3: Message Authenticity (Ed25519)                               │
//! │  ────────────────────────────────────────                               │
//! │  Every envelope is signed over its exact ciphertext and routing,      │
//! │  so the relay cannot substitute payloads or senders.                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Cryptographic primitives (keys, KDFs, AEAD, signing)
//! - [`codec`] - Transport-safe text encoding for binary artifacts
//! - [`identity`] - Account key lifecycle (register, login, session)
//! - [`envelope`] - Wire-ready sealed messages
//! - [`boundary`] - Store/directory traits and client request shapes

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod boundary;
pub mod codec;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod identity;
/// Time utilities for message records.
pub mod time;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use boundary::{IdentityStore, KeyDirectory, MemoryStore, MessageStore};
pub use crypto::{KeySet, PublicKeys, Signature, WrappedKeyRecord};
pub use envelope::SealedMessage;
pub use error::{Error, Result};
pub use identity::{Identity, Session};
