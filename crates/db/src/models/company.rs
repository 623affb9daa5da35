//! Company entity model and DTOs.

use crm_core::types::{Day, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::contact::{Email, Phone};

/// A company row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub responsible_person: String,
    pub description: String,
    /// Publication date, set once at creation.
    pub published: Day,
    /// Last-edited date, refreshed on every save.
    pub edited: Day,
}

/// Company fields submitted on create and update. The slug is never
/// submitted; it is derived from `name` server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyInput {
    #[validate(length(min = 1, max = 150, message = "Company name must be 1 to 150 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 150, message = "Responsible person must be 1 to 150 characters"))]
    pub responsible_person: String,
    #[serde(default)]
    pub description: String,
}

/// A company joined with its contact collections, the aggregate the
/// detail and update endpoints work with.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithContacts {
    #[serde(flatten)]
    pub company: Company,
    pub phones: Vec<Phone>,
    pub emails: Vec<Email>,
}

/// Whitelisted orderings for the company list (`sort_by` parameter).
/// Anything else falls back to the default publication-date ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyOrdering {
    NameAsc,
    NameDesc,
    PublishedAsc,
    PublishedDesc,
}

impl CompanyOrdering {
    /// Parse a `sort_by` query value; `-` prefix means descending.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("name") => CompanyOrdering::NameAsc,
            Some("-name") => CompanyOrdering::NameDesc,
            Some("-published") => CompanyOrdering::PublishedDesc,
            _ => CompanyOrdering::PublishedAsc,
        }
    }

    /// ORDER BY clause body. Values are fixed strings, never user input.
    pub fn sql(self) -> &'static str {
        match self {
            CompanyOrdering::NameAsc => "name ASC",
            CompanyOrdering::NameDesc => "name DESC",
            CompanyOrdering::PublishedAsc => "published ASC, id ASC",
            CompanyOrdering::PublishedDesc => "published DESC, id DESC",
        }
    }
}

/// Filter parameters for the company list.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Case-insensitive substring match on the company name.
    pub name_contains: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_length_bounds_both_apply() {
        let blank = CompanyInput {
            name: String::new(),
            responsible_person: "Someone".to_string(),
            description: String::new(),
        };
        assert!(blank.validate().unwrap_err().field_errors().contains_key("name"));

        let overlong = CompanyInput {
            name: "x".repeat(151),
            responsible_person: "Someone".to_string(),
            description: String::new(),
        };
        assert!(overlong.validate().unwrap_err().field_errors().contains_key("name"));

        let ok = CompanyInput {
            name: "Acme".to_string(),
            responsible_person: "Someone".to_string(),
            description: String::new(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn ordering_parses_sort_param() {
        assert_eq!(
            CompanyOrdering::from_param(Some("name")),
            CompanyOrdering::NameAsc
        );
        assert_eq!(
            CompanyOrdering::from_param(Some("-name")),
            CompanyOrdering::NameDesc
        );
        assert_eq!(
            CompanyOrdering::from_param(Some("-published")),
            CompanyOrdering::PublishedDesc
        );
        // Unknown fields and absence fall back to the default.
        assert_eq!(
            CompanyOrdering::from_param(Some("drop table")),
            CompanyOrdering::PublishedAsc
        );
        assert_eq!(
            CompanyOrdering::from_param(None),
            CompanyOrdering::PublishedAsc
        );
    }
}
