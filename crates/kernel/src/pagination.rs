//! Page/size arithmetic shared by the listing routes and the repository.
//!
//! Both sides must derive the window from the same [`Pagination`] value so
//! the echoed metadata always matches the rows actually returned.

use crate::error::{AppError, AppResult};

/// Page size used when the client sends none.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized pagination window. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Build a window, clamping out-of-range values.
    ///
    /// `page < 1` becomes 1, `size < 1` becomes [`DEFAULT_PAGE_SIZE`], and
    /// `size` above [`MAX_PAGE_SIZE`] is capped.
    pub fn new(page: i64, size: i64) -> Self {
        let page = page.max(1);
        let size = if size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            size.min(MAX_PAGE_SIZE)
        };
        Self { page, size }
    }

    /// Parse raw `page` / `size` query values.
    ///
    /// Missing or empty values fall back to defaults. Values that are not
    /// integers are rejected.
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> AppResult<Self> {
        let page = parse_param("page", page)?.unwrap_or(1);
        let size = parse_param("size", size)?.unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(Self::new(page, size))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Rows to skip: `(page - 1) * size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Rows to return.
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Whether rows exist beyond this window.
    pub fn has_more(&self, total_count: i64) -> bool {
        has_more(self.page, total_count, self.size)
    }

    /// Number of pages needed for `total_count` rows at this size.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        total_pages(total_count, self.size)
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be an integer, got '{value}'"))),
    }
}

/// `true` iff `page * size < total_count`.
pub fn has_more(page: i64, total_count: i64, size: i64) -> bool {
    page.saturating_mul(size) < total_count
}

/// `ceil(total_count / size)`, or 0 when there are no rows.
pub fn total_pages(total_count: i64, size: i64) -> i64 {
    if total_count <= 0 || size <= 0 {
        return 0;
    }
    (total_count + size - 1) / size
}
