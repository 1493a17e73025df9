//! Fixed-size page windows over counted collections.
//!
//! Page numbers come straight from the query string and are resolved
//! leniently: a missing or non-numeric value means the first page, and a value
//! outside `1..=total_pages` means the last page.

use serde::Serialize;

/// Default number of posts per feed page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Offset/limit of the resolved page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// An empty collection still has one (empty) page.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.per_page).max(1)
    }

    /// Resolve the raw `page` query value against `total_items`.
    pub fn window(&self, requested: Option<&str>, total_items: u64) -> PageWindow {
        let last = self.total_pages(total_items);
        let number = match requested.map(|raw| raw.trim().parse::<i64>()) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) => u64::try_from(n)
                .ok()
                .filter(|n| (1..=last).contains(n))
                .unwrap_or(last),
        };

        PageWindow {
            number,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    pub fn page<T>(&self, window: PageWindow, total_items: u64, items: Vec<T>) -> Page<T> {
        let total_pages = self.total_pages(total_items);
        Page {
            items,
            number: window.number,
            per_page: self.per_page,
            total_items,
            total_pages,
            has_next: window.number < total_pages,
            has_previous: window.number > 1,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_garbage_page_is_first() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(None, 35).number, 1);
        assert_eq!(paginator.window(Some("abc"), 35).number, 1);
        assert_eq!(paginator.window(Some("2.5"), 35).number, 1);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(Some("9"), 35).number, 4);
        assert_eq!(paginator.window(Some("0"), 35).number, 4);
        assert_eq!(paginator.window(Some("-2"), 35).number, 4);
    }

    #[test]
    fn test_window_offsets() {
        let paginator = Paginator::new(10);
        let window = paginator.window(Some(" 3 "), 35);
        assert_eq!(
            window,
            PageWindow {
                number: 3,
                offset: 20,
                limit: 10
            }
        );
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let paginator = Paginator::new(10);
        let window = paginator.window(Some("4"), 0);
        let page: Page<u8> = paginator.page(window, 0, vec![]);

        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_page_flags() {
        let paginator = Paginator::new(10);
        let window = paginator.window(Some("2"), 25);
        let page = paginator.page(window, 25, vec![1, 2, 3]);

        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.map(|n| n * 2).items, vec![2, 4, 6]);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(Paginator::new(0).per_page(), 1);
    }
}
