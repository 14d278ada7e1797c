//! # Pagination Tests
//!
//! Exhaustive checks of the page window arithmetic over small lists.

use cookbook::pagination::{paginate, DEFAULT_PAGE_SIZE};

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the page count formula and clamping for every small list and page size
    #[test]
    fn test_clamping_properties() {
        for len in 0..=23usize {
            let items: Vec<usize> = (0..len).collect();
            for size in 1..=6usize {
                let expected_total = len.div_ceil(size).max(1);
                let first = paginate(&items, 1, size);
                let last = paginate(&items, expected_total as i64, size);
                assert_eq!(first.total_pages, expected_total, "len={len} size={size}");

                for requested in -3..=0i64 {
                    assert_eq!(paginate(&items, requested, size), first);
                }
                for k in 1..=3i64 {
                    assert_eq!(paginate(&items, expected_total as i64 + k, size), last);
                }
            }
        }
    }

    /// Test that walking every page yields the whole list once, in order
    #[test]
    fn test_pages_cover_list_in_order() {
        let items: Vec<u32> = (1..=12).collect();
        let total = paginate(&items, 1, DEFAULT_PAGE_SIZE).total_pages;
        assert_eq!(total, 3);

        let walked: Vec<u32> = (1..=total as i64)
            .flat_map(|p| paginate(&items, p, DEFAULT_PAGE_SIZE).items.to_vec())
            .collect();
        assert_eq!(walked, items);
    }

    /// Test which navigation controls each page offers
    #[test]
    fn test_navigation_controls() {
        let items: Vec<u32> = (1..=11).collect();

        let first = paginate(&items, 1, 5);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.indicator(), "1/3");

        let middle = paginate(&items, 2, 5);
        assert!(middle.has_previous() && middle.has_next());

        let last = paginate(&items, 3, 5);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.items, &[11]);

        let single = paginate(&items[..3], 1, 5);
        assert!(!single.has_previous() && !single.has_next());
        assert_eq!(single.indicator(), "1/1");
    }
}
