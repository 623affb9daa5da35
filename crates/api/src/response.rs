//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paginated listings use
//! [`Paginated`], which carries page metadata and ready-made `next`/`prev`
//! links that preserve the caller's filter and sort parameters.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A page of results with navigation metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_count: i64,
    pub total: i64,
    /// Link to the next page with all other query parameters preserved,
    /// absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the previous page, absent on the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble a page, building `next`/`prev` links by re-serializing the
    /// caller's query struct with the page number swapped.
    pub fn new<Q, F>(path: &str, data: Vec<T>, page: i64, total: i64, page_size: i64, link: F) -> Self
    where
        Q: Serialize,
        F: Fn(i64) -> Q,
    {
        let page_count = crm_core::pagination::page_count(total, page_size);
        let next = (page < page_count).then(|| page_link(path, &link(page + 1)));
        let prev = (page > 1).then(|| page_link(path, &link(page - 1)));
        Paginated {
            data,
            page,
            page_count,
            total,
            next,
            prev,
        }
    }
}

fn page_link<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_urlencoded::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{path}?{qs}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageQuery;

    #[test]
    fn first_page_has_no_prev_link() {
        let q = PageQuery::default();
        let page = Paginated::new("/all-projects", vec![1, 2, 3], 1, 25, 10, |p| q.with_page(p));
        assert_eq!(page.page_count, 3);
        assert_eq!(page.next.as_deref(), Some("/all-projects?page=2"));
        assert!(page.prev.is_none());
    }

    #[test]
    fn last_page_has_no_next_link() {
        let q = PageQuery::default();
        let page = Paginated::new("/all-projects", vec![9], 3, 25, 10, |p| q.with_page(p));
        assert!(page.next.is_none());
        assert_eq!(page.prev.as_deref(), Some("/all-projects?page=2"));
    }

    #[test]
    fn links_preserve_filter_state() {
        let q = crate::query::CompanyListQuery {
            page: Some(2),
            sort_by: Some("-name".into()),
            name: Some("acme".into()),
        };
        let page: Paginated<i64> =
            Paginated::new("/", vec![], 2, 40, 10, |p| q.with_page(p));
        assert_eq!(page.next.as_deref(), Some("/?page=3&sort_by=-name&name=acme"));
        assert_eq!(page.prev.as_deref(), Some("/?page=1&sort_by=-name&name=acme"));
    }
}
