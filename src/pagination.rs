//! Page bookkeeping over the cached video list

use std::ops::Range;

pub const PAGE_SIZE: usize = 20;

/// Current page (1-based) over `count` items.
///
/// `current` always lies in `[1, total_pages()]`, or is 1 when there is
/// nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: usize,
    page_size: usize,
    count: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            count: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.count.div_ceil(self.page_size)
    }

    /// Replace the item count and re-clamp the current page
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.current = self.clamp(self.current);
    }

    #[cfg(test)]
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current = self.clamp(self.current);
    }

    /// Move to page `n`, clamped into range. Returns the page actually selected.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.current = self.clamp(n);
        self.current
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Index range of the current page within the item list
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.count);
        let end = (start + self.page_size).min(self.count);
        start..end
    }

    fn clamp(&self, n: usize) -> usize {
        n.clamp(1, self.total_pages().max(1))
    }
}
