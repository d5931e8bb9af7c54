//! Wire encoding and generation of secret material.
//!
//! The remote service transports secrets (vault master passwords, password
//! entry values) as standard base64 text. This module provides:
//! - [`encode`] / [`decode`] - the reversible wire encoding
//! - [`generate_random`] - alphanumeric secret generation from the OS CSPRNG

use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::secret::Secret;

/// Alphabet used for generated secrets.
const ALPHANUMERIC: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or
/// above it are rejected so every symbol stays equally likely.
const REJECTION_LIMIT: u8 = 248;

/// Length of master passwords, salts and hashes generated at vault creation.
pub const GENERATED_SECRET_LENGTH: usize = 12;

/// Error type for codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The wire value is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not valid UTF-8 text.
    #[error("decoded payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The randomness source failed while generating secret material.
    #[error("randomness source failed: {message}")]
    Entropy { message: String },
}

/// Encode a plaintext secret into its wire representation.
pub fn encode(plaintext: &str) -> String {
    general_purpose::STANDARD.encode(plaintext.as_bytes())
}

/// Decode a wire value back into plaintext.
///
/// Fails when the value is not valid base64 or does not decode to UTF-8.
pub fn decode(wire: &str) -> Result<Secret, CodecError> {
    let bytes = general_purpose::STANDARD.decode(wire)?;
    Ok(Secret::new(String::from_utf8(bytes)?))
}

/// Generate a random alphanumeric string of `length` characters.
///
/// Each character is drawn independently and uniformly from the 62-symbol
/// alphabet. A failure of the randomness source fails the whole generation.
pub fn generate_random(length: usize) -> Result<Secret, CodecError> {
    generate_with(&mut OsRng, length)
}

fn generate_with<R: RngCore>(rng: &mut R, length: usize) -> Result<Secret, CodecError> {
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 32];

    while out.len() < length {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| CodecError::Entropy {
                message: e.to_string(),
            })?;

        for &byte in buf.iter().filter(|&&b| b < REJECTION_LIMIT) {
            if out.len() == length {
                break;
            }
            out.push(ALPHANUMERIC[usize::from(byte) % ALPHANUMERIC.len()] as char);
        }
    }

    Ok(Secret::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RNG that fails every draw.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("entropy pool empty")))
        }
    }

    #[test]
    fn test_encode_known_value() {
        assert_eq!(encode("provider-test-password"), "cHJvdmlkZXItdGVzdC1wYXNzd29yZA==");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn test_decode_known_value() {
        let secret = decode("cHJvdmlkZXItdGVzdC1wYXNzd29yZA==").unwrap();
        assert_eq!(secret.expose(), "provider-test-password");
    }

    #[test]
    fn test_decode_roundtrip_unicode() {
        let wire = encode("pässwörd ✓");
        assert_eq!(decode(&wire).unwrap().expose(), "pässwörd ✓");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let result = decode("not base64!!");
        assert!(matches!(result, Err(CodecError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let wire = general_purpose::STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&wire), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn test_generate_random_length_and_alphabet() {
        let secret = generate_random(GENERATED_SECRET_LENGTH).unwrap();
        assert_eq!(secret.expose().len(), GENERATED_SECRET_LENGTH);
        assert!(secret.expose().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_random_long_and_empty() {
        assert_eq!(generate_random(500).unwrap().expose().len(), 500);
        assert!(generate_random(0).unwrap().is_empty());
    }

    #[test]
    fn test_generate_random_differs() {
        let a = generate_random(32).unwrap();
        let b = generate_random(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_fails_on_entropy_error() {
        let result = generate_with(&mut BrokenRng, 12);
        assert!(matches!(result, Err(CodecError::Entropy { .. })));
    }
}
