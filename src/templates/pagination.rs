//! Index pagination

use std::ops::Range;

/// Position of one index page within the post listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub current: usize,
    pub total_pages: usize,
    pub per_page: usize,
    total_items: usize,
}

impl Pagination {
    pub fn new(current: usize, per_page: usize, total_items: usize) -> Self {
        let per_page = per_page.max(1);
        Self {
            current: current.max(1),
            total_pages: total_items.div_ceil(per_page),
            per_page,
            total_items,
        }
    }

    /// Indices of the items shown on this page; empty past the last page
    pub fn range(&self) -> Range<usize> {
        let start = (self.current - 1)
            .saturating_mul(self.per_page)
            .min(self.total_items);
        let end = start.saturating_add(self.per_page).min(self.total_items);
        start..end
    }

    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    /// Page number links, with the current page as plain text.
    /// Nothing is rendered when everything fits on one page.
    pub fn render(&self) -> String {
        if self.total_pages <= 1 {
            return String::new();
        }

        let links: String = (1..=self.total_pages)
            .map(|i| {
                if i == self.current {
                    format!(r#"<span class="current-page">{}</span>"#, i)
                } else {
                    format!(r#"<a href="/?page={}">{}</a>"#, i, i)
                }
            })
            .collect();

        format!(r#"<div class="pagination">{}</div>"#, links)
    }
}

/// Parse the `page` query parameter; anything but a positive integer is page 1
pub fn parse_page_param(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}
