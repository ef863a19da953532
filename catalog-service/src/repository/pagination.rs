//! Ordering and offset/limit types for repository queries

use std::fmt;

use crate::query::PageRequest;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    /// SQL keyword
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Result ordering
///
/// `id` in the same direction is always appended as a tie-breaker so pages stay
/// stable when several rows share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: OrderDirection,
}

impl Sort {
    pub const fn new(column: &'static str, direction: OrderDirection) -> Self {
        Self { column, direction }
    }

    /// Descending by creation time
    pub const fn newest_first() -> Self {
        Self::new("created_at", OrderDirection::Descending)
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::newest_first()
    }
}

/// Offset/limit window
///
/// ```rust
/// use catalog_service::repository::Pagination;
///
/// let page3 = Pagination::page(3, 20);
/// assert_eq!(page3.offset, 40);
/// assert_eq!(page3.limit, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-indexed page
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        Self {
            offset: page_number.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

impl From<PageRequest> for Pagination {
    fn from(page: PageRequest) -> Self {
        Self::new(page.skip(), page.take())
    }
}
