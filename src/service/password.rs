//! Salted password hashing for the credentials surface.
//!
//! The salt is generated per credential and stored next to the hash, so equal
//! passwords never share a digest across rows.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Hex-encoded SHA-256 of password concatenated with salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fresh random salt for a new credential row.
pub fn generate_salt() -> String {
    Uuid::new_v4().to_string()
}

/// Constant-time comparison of a supplied password against a stored
/// hash/salt pair.
pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    let computed = hash_password(password, salt);
    bool::from(computed.as_bytes().ct_eq(stored_hash.as_bytes()))
}
