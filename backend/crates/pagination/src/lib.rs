//! Offset pagination primitives shared by the user directory endpoints.
//!
//! The crate keeps the page arithmetic in one place so HTTP adapters and
//! persistence adapters agree on how `page` and `limit` are clamped and how
//! many pages a result set spans.
//!
//! # Example
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::from_query(Some("2"), Some("500"));
//! assert_eq!(request.page(), 2);
//! assert_eq!(request.limit(), 50);
//! assert_eq!(request.offset(), 50);
//!
//! let page = Page::new(request, 51, vec!["only item on page two"]);
//! assert_eq!(page.total_pages(), 2);
//! ```

mod page;
mod request;

pub use page::{Page, total_pages};
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest, parse_leading_integer};
