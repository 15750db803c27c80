//! Fixed-size, page-number pagination with forgiving token handling.
//!
//! Listing queries never fail on a bad `page` parameter: tokens that do not
//! parse as a positive integer fall back to page 1, and tokens past the end
//! clamp to the last page once the total is known.

use std::num::NonZeroU32;

/// Interpret a raw page token from the query string.
///
/// `None`, the empty string, `"abc"`, `"-1"` and `"0"` all resolve to page 1.
pub fn parse_page_token(token: Option<&str>) -> u64 {
    token
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: NonZeroU32,
}

/// A located page within a counted result set: which page, how many pages
/// exist, and the offset/limit to fetch it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub total_pages: u64,
    pub offset: u64,
    pub limit: u32,
}

impl Paginator {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Locate `requested` within a set of `total_items`, clamping to the last
    /// page. An empty set yields a single empty page 1.
    pub fn locate(&self, requested: u64, total_items: u64) -> PageWindow {
        let size = u64::from(self.page_size.get());
        let total_pages = total_items.div_ceil(size).max(1);
        let number = requested.clamp(1, total_pages);

        PageWindow {
            number,
            total_pages,
            offset: (number - 1) * size,
            limit: self.page_size.get(),
        }
    }
}

/// A fetched page plus the metadata the view layer needs for controls.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}
