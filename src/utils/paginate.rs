//! Fixed-size page windows over an already ordered list.

use serde::Serialize;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Page size must be at least 1")]
    InvalidPageSize,

    #[error("Page {page} is out of range (1-{total_pages})")]
    OutOfRange { page: usize, total_pages: usize },
}

/// A pager with a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Create a pager, rejecting a zero page size
    pub fn new(page_size: usize) -> Result<Self, PageError> {
        if page_size == 0 {
            return Err(PageError::InvalidPageSize);
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total_items`; never less than one.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Row offset of a 1-indexed page, after checking it is in range
    pub fn offset(&self, page: usize, total_items: usize) -> Result<usize, PageError> {
        let total_pages = self.total_pages(total_items);
        if page == 0 || page > total_pages {
            return Err(PageError::OutOfRange { page, total_pages });
        }
        Ok((page - 1) * self.page_size)
    }

    /// Bring `page` into `1..=total_pages`
    pub fn clamp(&self, page: usize, total_items: usize) -> usize {
        page.clamp(1, self.total_pages(total_items))
    }

    /// Slice the visible window for a 1-indexed page.
    ///
    /// Pages outside `1..=total_pages` are rejected rather than clamped. Page 1
    /// of an empty list is valid and has no items.
    pub fn window<'a, T>(&self, items: &'a [T], page: usize) -> Result<PageWindow<'a, T>, PageError> {
        let start = self.offset(page, items.len())?;
        let end = (start + self.page_size).min(items.len());

        Ok(PageWindow {
            page,
            page_size: self.page_size,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
            items: &items[start..end],
        })
    }
}

/// The rows visible on one page plus the tally a page selector needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWindow<'a, T> {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

impl<T> PageWindow<'_, T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-indexed position of the first visible item, or 0 on an empty page
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-indexed position of the last visible item, or 0 on an empty page
    pub fn last_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + self.items.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(Pagination::new(0), Err(PageError::InvalidPageSize));
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let pager = Pagination::new(10).unwrap();
        let items: Vec<u32> = vec![];

        assert_eq!(pager.total_pages(0), 1);
        let window = pager.window(&items, 1).unwrap();
        assert!(window.items.is_empty());
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.first_item_number(), 0);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_partial_last_page() {
        let pager = Pagination::new(10).unwrap();
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(pager.total_pages(items.len()), 3);

        let first = pager.window(&items, 1).unwrap();
        assert_eq!(first.items, &items[0..10]);
        assert!(first.has_next());

        let last = pager.window(&items, 3).unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items, &[21, 22, 23, 24, 25]);
        assert_eq!(last.first_item_number(), 21);
        assert_eq!(last.last_item_number(), 25);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_out_of_range_pages_rejected() {
        let pager = Pagination::new(10).unwrap();
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(
            pager.window(&items, 4).unwrap_err(),
            PageError::OutOfRange {
                page: 4,
                total_pages: 3
            }
        );
        assert_eq!(
            pager.window(&items, 0).unwrap_err(),
            PageError::OutOfRange {
                page: 0,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_exact_multiple() {
        let pager = Pagination::new(5).unwrap();
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(pager.total_pages(items.len()), 2);
        assert_eq!(pager.window(&items, 2).unwrap().items.len(), 5);
    }

    #[test]
    fn test_clamp() {
        let pager = Pagination::new(10).unwrap();
        assert_eq!(pager.clamp(0, 25), 1);
        assert_eq!(pager.clamp(2, 25), 2);
        assert_eq!(pager.clamp(9, 25), 3);
        assert_eq!(pager.clamp(9, 0), 1);
    }
}
