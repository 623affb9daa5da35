//! Project entity model and DTOs.

use crm_core::types::{Day, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub description: String,
    pub started_at: Day,
    pub finished_at: Option<Day>,
    pub cost: Option<i32>,
}

/// Project fields submitted on create and update.
///
/// The date-order rule (`started_at` must not be after `finished_at`) is a
/// cross-field check run separately so its error lands on `started_at`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 250, message = "Title must be 1 to 250 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub started_at: Day,
    pub finished_at: Option<Day>,
    #[validate(range(min = 0, message = "Cost must not be negative"))]
    pub cost: Option<i32>,
}

/// A project joined with its owning company, for the global listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectListItem {
    pub id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub started_at: Day,
    pub finished_at: Option<Day>,
    pub cost: Option<i32>,
    pub company_name: String,
    pub company_slug: String,
}

/// Filter parameters for project listings.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring match on the project title.
    pub title_contains: Option<String>,
    /// Case-insensitive substring match on the owning company's name.
    pub company_contains: Option<String>,
}
