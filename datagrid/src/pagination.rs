//! Page slicing of the modified view.

use std::ops::Range;

use log::debug;

use crate::element::{Element, ElementKind};
use crate::options::PaginationOptions;

/// Current page state.
///
/// Totals are counted over the modified view, never the source table. The
/// page index is always within `0..page_count()`, and there is at least one
/// page even when the view is empty.
///
/// # Example
///
/// ```
/// use datagrid::options::PaginationOptions;
/// use datagrid::pagination::Pagination;
///
/// let mut pagination = Pagination::new(&PaginationOptions {
///     enabled: true,
///     page_size: 10,
///     ..Default::default()
/// });
/// pagination.set_total(25);
///
/// assert_eq!(pagination.page_count(), 3);
/// pagination.last_page();
/// assert_eq!(pagination.range(), 20..25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    enabled: bool,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    total: usize,
}

impl Pagination {
    pub fn new(options: &PaginationOptions) -> Self {
        Self {
            enabled: options.enabled,
            page: options.page,
            page_size: options.page_size.max(1),
            page_size_options: options.page_size_options.clone(),
            total: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Rows in the modified view.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pages, at least 1.
    pub fn page_count(&self) -> usize {
        if !self.enabled {
            return 1;
        }
        self.total.div_ceil(self.page_size).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Positions of the current page within the modified view.
    pub fn range(&self) -> Range<usize> {
        if !self.enabled {
            return 0..self.total;
        }
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Updates the row total, clamping the page index if the view shrank.
    ///
    /// Returns `true` if the page index changed.
    pub fn set_total(&mut self, total: usize) -> bool {
        self.total = total;
        self.clamp()
    }

    /// Turns pagination on or off. Returns `true` if anything changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.page = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to(page),
            None => false,
        }
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to(self.page_count() - 1)
    }

    /// Moves to a page, clamped to the last page. Returns `true` if it moved.
    pub fn go_to(&mut self, page: usize) -> bool {
        let page = page.min(self.page_count() - 1);
        if page == self.page {
            return false;
        }
        debug!("Page {} -> {}", self.page, page);
        self.page = page;
        true
    }

    /// Changes the page size and returns to the first page.
    ///
    /// Returns `true` if the size or page changed.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size && self.page == 0 {
            return false;
        }
        self.page_size = page_size;
        self.page = 0;
        true
    }

    /// Picks one of the configured page sizes by index.
    pub fn select_page_size_option(&mut self, index: usize) -> bool {
        match self.page_size_options.get(index) {
            Some(&size) => self.set_page_size(size),
            None => false,
        }
    }

    fn clamp(&mut self) -> bool {
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
            return true;
        }
        false
    }

    /// Draws the pagination footer.
    pub fn view(&self) -> Element {
        Element::new(ElementKind::Pagination)
            .content(format!(
                "Page {} of {} ({} rows)",
                self.page + 1,
                self.page_count(),
                self.total
            ))
            .data("page", self.page)
            .data("pageCount", self.page_count())
            .data("pageSize", self.page_size)
    }
}
