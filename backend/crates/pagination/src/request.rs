//! Validated page requests.

use serde::{Deserialize, Serialize};

/// Upper bound for `perPage` accepted from clients.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised when a client supplies an unusable page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// `perPage` must be within `1..=MAX_PER_PAGE`.
    #[error("perPage must be between 1 and {max}")]
    PerPageOutOfRange {
        /// Largest accepted page size.
        max: u32,
    },
}

/// One-based page number together with the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `page` is zero or `per_page` falls
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PaginationError::PerPageOutOfRange { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when an explicit value is out of range.
    pub fn from_query(
        page: Option<u32>,
        per_page: Option<u32>,
        default_per_page: u32,
    ) -> Result<Self, PaginationError> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(default_per_page))
    }

    /// First page with the given size, clamped into the valid range.
    #[must_use]
    pub const fn first(per_page: u32) -> Self {
        let per_page = if per_page == 0 {
            1
        } else if per_page > MAX_PER_PAGE {
            MAX_PER_PAGE
        } else {
            per_page
        };
        Self { page: 1, per_page }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset for `OFFSET` clauses.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Row limit for `LIMIT` clauses.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Same size, page number replaced.
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            per_page: self.per_page,
        }
    }
}
