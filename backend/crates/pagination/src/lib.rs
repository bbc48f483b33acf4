//! Page-number pagination primitives shared by list endpoints.
//!
//! The crate has two halves:
//!
//! - [`PageRequest`] validates the `page`/`perPage` pair supplied by a client
//!   and exposes the SQL-friendly `offset`/`limit` values.
//! - [`Page`] is the response envelope carrying one page of items, the total
//!   row count, and navigation links derived from the request URL.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 5).expect("valid page request");
//! assert_eq!(request.offset(), 5);
//!
//! let page = Page::new(vec!["a", "b"], request, 7);
//! assert_eq!(page.total_pages(), 2);
//! assert!(!page.has_next());
//! ```

mod envelope;
mod request;

pub use envelope::{Page, PageLinks};
pub use request::{MAX_PER_PAGE, PageRequest, PaginationError};
