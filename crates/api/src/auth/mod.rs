//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`reset`] -- opaque password-reset tokens (SHA-256 hashed at rest).

pub mod jwt;
pub mod password;
pub mod reset;
