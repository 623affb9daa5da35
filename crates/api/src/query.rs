//! Typed query parameters for list endpoints.
//!
//! Each struct round-trips through `serde_urlencoded` so pagination links can
//! carry the caller's filter and sort state verbatim: the handler clones the
//! incoming struct, swaps the page number, and re-serializes it.

use crm_core::types::DbId;
use crm_db::models::interaction::{Channel, Mark};
use serde::{Deserialize, Serialize};

/// Query parameters for the company list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whitelisted sort key: `name`, `-name`, `-published`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Case-insensitive substring match on the company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Query parameters for the global project list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Case-insensitive substring match on the project title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Case-insensitive substring match on the owning company's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Query parameters for the global interaction list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InteractionListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    /// Exact match on the creating manager's id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<DbId>,
    /// Case-insensitive substring match on the project title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Case-insensitive substring match on the company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Bare page-number query for lists without filters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

macro_rules! impl_with_page {
    ($($ty:ty),+) => {
        $(impl $ty {
            /// Clone of this query pointed at a different page.
            pub fn with_page(&self, page: i64) -> Self {
                let mut q = self.clone();
                q.page = Some(page);
                q
            }
        })+
    };
}

impl_with_page!(CompanyListQuery, ProjectListQuery, InteractionListQuery, PageQuery);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trips_through_urlencoded() {
        let q = CompanyListQuery {
            page: Some(2),
            sort_by: Some("-name".into()),
            name: Some("stark industries".into()),
        };
        let encoded = serde_urlencoded::to_string(&q).unwrap();
        let decoded: CompanyListQuery = serde_urlencoded::from_str(&encoded).unwrap();
        assert_eq!(decoded.page, Some(2));
        assert_eq!(decoded.sort_by.as_deref(), Some("-name"));
        assert_eq!(decoded.name.as_deref(), Some("stark industries"));
    }

    #[test]
    fn absent_fields_are_omitted_from_links() {
        let q = ProjectListQuery::default().with_page(3);
        let encoded = serde_urlencoded::to_string(&q).unwrap();
        assert_eq!(encoded, "page=3");
    }

    #[test]
    fn enum_filters_encode_as_their_wire_names() {
        let q = InteractionListQuery {
            channel: Some(Channel::CompanyInitiative),
            mark: Some(Mark::Good),
            ..Default::default()
        };
        let encoded = serde_urlencoded::to_string(&q).unwrap();
        assert_eq!(encoded, "channel=company-initiative&mark=good");
    }
}
