//! Cryptographic utilities for signature verification and secret comparison.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

/// Errors raised while checking a signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature is not valid hex")]
    InvalidEncoding,

    #[error("Signing key is empty")]
    EmptyKey,
}

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Computes the hex encoded HMAC-SHA512 of `payload` keyed with `secret`.
pub fn hmac_sha512_hex(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptyKey);
    }
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::EmptyKey)?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a hex encoded HMAC-SHA512 signature over `payload`.
///
/// Comparison happens in constant time. Returns `Ok(false)` for a well-formed
/// signature that does not match.
pub fn verify_hmac_sha512_hex(
    secret: &str,
    payload: &[u8],
    signature_hex: &str,
) -> Result<bool, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptyKey);
    }
    let expected =
        hex::decode(signature_hex.trim()).map_err(|_| SignatureError::InvalidEncoding)?;
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::EmptyKey)?;
    mac.update(payload);
    Ok(mac.verify_slice(&expected).is_ok())
}

/// Compares two secrets without leaking the position of the first mismatch.
///
/// Both values are hashed first so the comparison length never depends on input.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
