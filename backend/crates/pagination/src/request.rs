//! Page request parsing and clamping.

/// Page number used when the client omits `page` or sends an unusable value.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client omits `limit` or sends a value below one.
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 50;

/// Validated page coordinates.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Clamp raw integers into a valid request.
    ///
    /// Pages below one become the first page. Limits below one fall back to
    /// [`DEFAULT_LIMIT`]; limits above [`MAX_LIMIT`] are capped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(-3, 0);
    /// assert_eq!((request.page(), request.limit()), (1, 5));
    /// ```
    #[must_use]
    pub fn new(page: i64, limit: i64) -> Self {
        let clamped_page = if page < 1 {
            DEFAULT_PAGE
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };
        let clamped_limit = if limit < 1 {
            DEFAULT_LIMIT
        } else {
            u32::try_from(limit).unwrap_or(MAX_LIMIT).min(MAX_LIMIT)
        };
        Self {
            page: clamped_page,
            limit: clamped_limit,
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// Values are read like a lenient integer parser: leading whitespace and
    /// an optional sign are accepted, parsing stops at the first non-digit,
    /// and values without any leading digit fall back to the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("3rd"), Some("abc"));
    /// assert_eq!((request.page(), request.limit()), (3, 5));
    /// ```
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let raw_page = page
            .and_then(parse_leading_integer)
            .unwrap_or(i64::from(DEFAULT_PAGE));
        let raw_limit = limit
            .and_then(parse_leading_integer)
            .unwrap_or(i64::from(DEFAULT_LIMIT));
        Self::new(raw_page, raw_limit)
    }

    /// One-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Parse the leading integer of `raw`.
///
/// Returns `None` when no digit follows the optional sign. Overflowing values
/// saturate.
///
/// # Examples
///
/// ```
/// use pagination::parse_leading_integer;
///
/// assert_eq!(parse_leading_integer("  42px"), Some(42));
/// assert_eq!(parse_leading_integer("-7"), Some(-7));
/// assert_eq!(parse_leading_integer("2.9"), Some(2));
/// assert_eq!(parse_leading_integer("px"), None);
/// ```
#[must_use]
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let mut chars = raw.trim_start().chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for ch in chars {
        let Some(digit) = ch.to_digit(10) else {
            break;
        };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { value.saturating_neg() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 5, 1, 5)]
    #[case(0, 5, 1, 5)]
    #[case(-4, 5, 1, 5)]
    #[case(2, 0, 2, 5)]
    #[case(2, -1, 2, 5)]
    #[case(2, 51, 2, 50)]
    #[case(2, 50, 2, 50)]
    #[case(7, i64::MAX, 7, 50)]
    #[case(i64::MAX, 10, u32::MAX, 10)]
    fn new_clamps_page_and_limit(
        #[case] page: i64,
        #[case] limit: i64,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(None, None, 1, 5)]
    #[case(Some(""), Some(""), 1, 5)]
    #[case(Some("0"), Some("0"), 1, 5)]
    #[case(Some("-2"), Some("-10"), 1, 5)]
    #[case(Some("4"), Some("100"), 4, 50)]
    #[case(Some(" 3 "), Some("12abc"), 3, 12)]
    #[case(Some("two"), Some("ten"), 1, 5)]
    fn from_query_mirrors_lenient_parsing(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::from_query(page, limit);
        assert_eq!(
            (request.page(), request.limit()),
            (expected_page, expected_limit)
        );
    }

    #[rstest]
    #[case(1, 5, 0)]
    #[case(2, 5, 5)]
    #[case(3, 50, 100)]
    fn offset_skips_previous_pages(#[case] page: i64, #[case] limit: i64, #[case] offset: u64) {
        assert_eq!(PageRequest::new(page, limit).offset(), offset);
    }

    #[rstest]
    fn offset_does_not_overflow_for_largest_page() {
        let request = PageRequest::new(i64::MAX, 50);
        assert_eq!(request.offset(), u64::from(u32::MAX - 1) * 50);
    }

    #[rstest]
    #[case("+8", Some(8))]
    #[case("\t15", Some(15))]
    #[case("-", None)]
    #[case("99999999999999999999999", Some(i64::MAX))]
    fn parse_leading_integer_edge_cases(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_leading_integer(raw), expected);
    }

    #[rstest]
    fn default_matches_constants() {
        let request = PageRequest::default();
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }
}
