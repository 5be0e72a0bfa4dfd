//! Password digesting.
//!
//! Credentials are never persisted in plaintext: the credential store holds
//! SHA-256 digests only, computed here at registration and login time.
//! Login compares digest against digest, so a plaintext password exists
//! only transiently in the caller's memory.

use sha2::{Digest, Sha256};

/// SHA-256 digest of a password, as a 64-char lowercase hex string.
///
/// Deterministic: equal inputs always produce equal output, which is the
/// whole login contract — `digest(entered) == stored_digest`.
pub fn digest(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    format!("{:x}", hash)
}
