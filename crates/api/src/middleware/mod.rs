//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`guard::RequireSuperuser`] -- Requires the superuser flag.
//! - [`guard::ensure_owner`] -- Post-load ownership check for manager-owned rows.

pub mod auth;
pub mod guard;
