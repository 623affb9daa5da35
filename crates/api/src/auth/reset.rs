//! Opaque password-reset tokens.
//!
//! Reset tokens are random strings delivered out of band; only their SHA-256
//! hash is stored server-side so a database leak does not expose live tokens.

use chrono::{Duration, Utc};
use crm_core::types::Timestamp;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Reset token lifetime in minutes.
pub const RESET_TOKEN_EXPIRY_MINS: i64 = 60;

/// Generate a cryptographically random reset token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext is
/// delivered to the user; only the hash should be persisted.
pub fn generate_reset_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_reset_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a reset token.
///
/// Use this to compare an incoming token against the stored hash.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Expiry timestamp for a reset token issued now.
pub fn reset_token_expiry() -> Timestamp {
    Utc::now() + Duration::minutes(RESET_TOKEN_EXPIRY_MINS)
}
