//! Page window arithmetic shared by the catalog and favorites listings.
//!
//! Pagination never fails: out-of-range requests are clamped to the
//! nearest valid page.

/// Default number of entries per listing page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Always at least 1, even for an empty list
    pub total_pages: usize,
    /// The clamped, 1-based page actually shown
    pub page: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// The `page/total` label of the non-actionable indicator button
    pub fn indicator(&self) -> String {
        format!("{}/{}", self.page, self.total_pages)
    }
}

/// Window of `items` for `requested_page`, clamped into `1..=total_pages`.
///
/// A `page_size` of zero is treated as one.
pub fn paginate<T>(items: &[T], requested_page: i64, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages as i64) as usize;

    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        total_pages,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.indicator(), "1/1");
    }

    #[test]
    fn test_last_page_is_truncated() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, 3, 5);
        assert_eq!(page.items, &[11, 12]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_out_of_range_requests_clamp() {
        let items: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&items, 0, 5), paginate(&items, 1, 5));
        assert_eq!(paginate(&items, -4, 5), paginate(&items, 1, 5));
        assert_eq!(paginate(&items, 99, 5), paginate(&items, 3, 5));
    }

    #[test]
    fn test_middle_page_has_both_controls() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, 2, 5);
        assert_eq!(page.items, &[6, 7, 8, 9, 10]);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.indicator(), "2/3");
    }

    #[test]
    fn test_zero_page_size_does_not_panic() {
        let items = [1, 2];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.items, &[2]);
        assert_eq!(page.total_pages, 2);
    }
}
