//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
///
/// Pages are 1-indexed: `page = 1` is the first page and the database offset
/// is `(page - 1) * per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: usize,
    /// The number of items per page.
    pub per_page: usize,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_PER_PAGE: usize = 20;
    /// The maximum allowed page size.
    pub const MAX_PER_PAGE: usize = 100;

    /// Creates a new page request, clamping the size to the allowed range.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Creates a page request for the first page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }

    /// Returns the offset for database queries.
    ///
    /// A `page` of 0 is treated as the first page; the fields are public and
    /// deserializable, so the clamp in [`new`](Self::new) cannot be assumed.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.per_page
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A page of results, carrying the total count of matching items before
/// pagination was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The page number (1-indexed).
    pub page: usize,
    /// The number of items per page.
    pub per_page: usize,
    /// The total number of matching items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: u64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(page: usize, per_page: usize) -> Self {
        Self::new(Vec::new(), page, per_page, 0)
    }

    /// The total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as u64)
    }

    /// Maps the page items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }

    /// Returns true if the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
