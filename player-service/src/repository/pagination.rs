//! Pagination parameters for repository queries

/// Offset/limit window over an ordered result set
///
/// ```rust
/// use player_service::repository::Pagination;
///
/// let third = Pagination::from_page_index(2, 3);
/// assert_eq!(third.offset, 6);
/// assert_eq!(third.limit, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Default number of players per page
    pub const DEFAULT_PAGE_SIZE: u64 = 3;

    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a zero-based page index
    #[must_use]
    pub const fn from_page_index(page_number: u64, page_size: u64) -> Self {
        Self {
            offset: page_number.saturating_mul(page_size),
            limit: page_size,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_page_index(0, Self::DEFAULT_PAGE_SIZE)
    }
}
