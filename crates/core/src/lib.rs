//! Domain logic shared by the CRM backend crates.
//!
//! No database or HTTP dependencies live here: slug generation, the domain
//! error enum, cross-field validation rules, and pagination clamping are
//! all pure functions testable without a running server.

pub mod error;
pub mod pagination;
pub mod slug;
pub mod types;
pub mod validation;
