//! Transport-safe text encoding for key and cipher material.
//!
//! Every binary artifact that crosses a storage or network boundary
//! (public keys, wrapped private keys, nonces, salts, ciphertexts,
//! signatures) goes through this module exactly once. The encoding is
//! standard base64: deterministic, lossless, and byte-order preserving
//! for all inputs including the empty sequence.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{Error, Result};

/// Encode arbitrary bytes as base64 text.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode base64 text back into bytes.
///
/// Fails with `InvalidInput` on malformed text; never truncates.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text)
        .map_err(|e| Error::InvalidInput(format!("malformed base64: {}", e)))
}

/// Decode base64 text into a fixed-length array.
///
/// Used for artifacts with a contractual size (nonces, salts, raw keys).
/// A length mismatch is rejected, not padded or truncated.
pub fn decode_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = decode(text)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("expected {} bytes, got {}", N, len)))
}

/// Serde adapter: `Vec<u8>` fields as base64 strings.
pub mod b64 {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BASE64;
    use base64::Engine as _;

    /// Serialize bytes as a base64 string
    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    /// Deserialize a base64 string into bytes
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BASE64.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: fixed-length byte arrays as base64 strings.
pub mod b64_array {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BASE64;
    use base64::Engine as _;

    /// Serialize a byte array as a base64 string
    pub fn serialize<S, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    /// Deserialize a base64 string into a byte array, rejecting length
    /// mismatches
    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = BASE64.decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cases: &[&[u8]] = &[
            b"",
            b"a",
            b"hello world",
            &[0u8; 64],
            &[0xFFu8; 1024],
        ];
        for case in cases {
            let encoded = encode(case);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(&decoded, case);
        }
    }

    #[test]
    fn test_round_trip_large() {
        let data: Vec<u8> = (0..70_000).map(|i| (i % 251) as u8).collect();
        let decoded = decode(&encode(&data)).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(decode("not base64 !!!").is_err());
    }

    #[test]
    fn test_decode_array_exact() {
        let encoded = encode(&[7u8; 12]);
        let decoded: [u8; 12] = decode_array(&encoded).unwrap();
        assert_eq!(decoded, [7u8; 12]);
    }

    #[test]
    fn test_decode_array_wrong_length() {
        let encoded = encode(&[7u8; 11]);
        let result: Result<[u8; 12]> = decode_array(&encoded);
        assert!(result.is_err());
    }
}
