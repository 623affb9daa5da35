//! Interaction entity model, channel/mark enumerations, and DTOs.

use crm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// How an interaction originated. Stored as the one-character codes the
/// legacy data uses (r/l/w/i).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "varchar")]
pub enum Channel {
    #[sqlx(rename = "r")]
    Request,
    #[sqlx(rename = "l")]
    Letter,
    #[sqlx(rename = "w")]
    Website,
    #[sqlx(rename = "i")]
    CompanyInitiative,
}

impl Channel {
    /// One-character storage code.
    pub fn code(self) -> &'static str {
        match self {
            Channel::Request => "r",
            Channel::Letter => "l",
            Channel::Website => "w",
            Channel::CompanyInitiative => "i",
        }
    }
}

/// Ordinal interaction rating, terrible (1) through excellent (5).
/// Stored as the one-character codes 1..5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar")]
pub enum Mark {
    #[sqlx(rename = "1")]
    Terrible,
    #[sqlx(rename = "2")]
    Bad,
    #[sqlx(rename = "3")]
    Normal,
    #[sqlx(rename = "4")]
    Good,
    #[sqlx(rename = "5")]
    Excellent,
}

impl Mark {
    /// Numeric score 1..5.
    pub fn score(self) -> u8 {
        match self {
            Mark::Terrible => 1,
            Mark::Bad => 2,
            Mark::Normal => 3,
            Mark::Good => 4,
            Mark::Excellent => 5,
        }
    }

    /// One-character storage code.
    pub fn code(self) -> &'static str {
        match self {
            Mark::Terrible => "1",
            Mark::Bad => "2",
            Mark::Normal => "3",
            Mark::Good => "4",
            Mark::Excellent => "5",
        }
    }
}

/// An interaction row from the `interactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interaction {
    pub id: DbId,
    pub project_id: DbId,
    pub manager_id: DbId,
    pub channel: Channel,
    pub description: String,
    pub mark: Mark,
    /// Set once at creation.
    pub created_at: Timestamp,
    /// Refreshed on every modification.
    pub updated_at: Timestamp,
}

/// Interaction fields submitted on create and update. Project and manager
/// are taken from the URL and the authenticated user, never the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InteractionInput {
    pub channel: Channel,
    #[serde(default)]
    pub description: String,
    pub mark: Mark,
}

/// An interaction joined with its project, company, and manager, for
/// listings that filter on those relations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InteractionListItem {
    pub id: DbId,
    pub project_id: DbId,
    pub manager_id: DbId,
    pub channel: Channel,
    pub mark: Mark,
    pub updated_at: Timestamp,
    pub project_title: String,
    pub company_name: String,
    pub company_slug: String,
    pub manager_username: String,
}

/// Filter parameters for interaction listings.
#[derive(Debug, Clone, Default)]
pub struct InteractionFilter {
    pub channel: Option<Channel>,
    pub mark: Option<Mark>,
    pub manager_id: Option<DbId>,
    /// Case-insensitive substring match on the project title.
    pub project_contains: Option<String>,
    /// Case-insensitive substring match on the company name.
    pub company_contains: Option<String>,
}
