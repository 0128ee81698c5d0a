//! Page-size bookkeeping and limit/offset arithmetic.

use crate::clause::Limit;

/// Rows per page when a builder is not told otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The page size used to derive limit/offset pairs. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    size: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Paging {
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paging {
    /// A paging state with the size clamped to a floor of 1.
    pub fn new(size: u32) -> Self {
        Paging { size: size.max(1) }
    }

    pub fn size(self) -> u32 {
        self.size
    }

    pub fn set(&mut self, size: u32) {
        self.size = size.max(1);
    }

    /// Limit and offset for a 1-based page number.
    ///
    /// Page 1 is rows 1..=size, page 2 the next size rows, and so on.
    /// Page 0 does not exist and clears the limit instead.
    pub fn limit_page(self, page: u32) -> Limit {
        if page > 0 {
            Limit {
                count: u64::from(self.size),
                offset: u64::from(self.size) * u64::from(page - 1),
            }
        } else {
            Limit::default()
        }
    }

    /// How many pages a row count occupies; zero rows is zero pages.
    pub fn pages_for(self, count: u64) -> u64 {
        count.div_ceil(u64::from(self.size))
    }
}
