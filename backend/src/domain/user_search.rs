//! Listing criteria for the user directory.

use pagination::PageRequest;

use super::user::User;

/// Non-empty free-text search term, kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Wrap a raw term; empty input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    /// Term text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Record filter applied to list queries.
///
/// A search term matches when it occurs, ignoring case, anywhere in the
/// name, email or address. Wildcard characters match literally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    search: Option<SearchTerm>,
}

impl UserFilter {
    /// Filter matching every user.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from an optional raw search string.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::UserFilter;
    ///
    /// assert!(UserFilter::from_search(Some("")).search().is_none());
    /// assert_eq!(
    ///     UserFilter::from_search(Some("an")).search().map(|term| term.as_str()),
    ///     Some("an"),
    /// );
    /// ```
    pub fn from_search(raw: Option<&str>) -> Self {
        Self {
            search: raw.and_then(SearchTerm::new),
        }
    }

    /// Active search term, if any.
    pub fn search(&self) -> Option<&SearchTerm> {
        self.search.as_ref()
    }

    /// Evaluate the filter in memory.
    pub fn matches(&self, user: &User) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let needle = term.as_str().to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(user.name().as_ref())
            || contains(user.email().as_ref())
            || user.address().is_some_and(|address| contains(address.as_ref()))
    }
}

/// A single list query: which page and which records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListRequest {
    pub page: PageRequest,
    pub filter: UserFilter,
}

impl UserListRequest {
    /// Bundle pagination and filter.
    pub fn new(page: PageRequest, filter: UserFilter) -> Self {
        Self { page, filter }
    }
}
