//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - An update DTO where the entity supports in-place edits

pub mod company;
pub mod contact;
pub mod interaction;
pub mod project;
pub mod user;
