//! Page envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// Number of pages needed to hold `total` items at `limit` items per page.
///
/// A zero `limit` yields zero pages.
///
/// # Examples
///
/// ```
/// use pagination::total_pages;
///
/// assert_eq!(total_pages(0, 5), 0);
/// assert_eq!(total_pages(11, 5), 3);
/// ```
#[must_use]
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// One page of results together with the counters clients need to navigate.
///
/// Serialises as `{"page", "limit", "total", "totalPages", "data"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
    data: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page from the request that produced it.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, data: Vec<T>) -> Self {
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total_pages(total, request.limit()),
            data,
        }
    }

    /// One-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size used for the query.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items matching the query across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages spanned by `total`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 5, 0)]
    #[case(1, 5, 1)]
    #[case(5, 5, 1)]
    #[case(6, 5, 2)]
    #[case(101, 50, 3)]
    #[case(3, 0, 0)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] limit: u32, #[case] expected: u64) {
        assert_eq!(total_pages(total, limit), expected);
    }

    #[rstest]
    fn page_serialises_with_camel_case_counters() {
        let page = Page::new(PageRequest::new(2, 2), 3, vec!["c"]);
        let value = serde_json::to_value(&page).ok();
        assert_eq!(
            value,
            Some(json!({
                "page": 2,
                "limit": 2,
                "total": 3,
                "totalPages": 2,
                "data": ["c"],
            }))
        );
    }
}
