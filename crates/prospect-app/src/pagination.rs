// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_MAX_PAGINATION_LINKS: usize = 5;

/// The set of page links to draw: a centered window plus optional
/// first/last affordances when the window does not already touch them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub total_pages: usize,
    pub pages: Vec<usize>,
    pub show_first: bool,
    pub leading_gap: bool,
    pub show_last: bool,
    pub trailing_gap: bool,
}

pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page)
}

pub fn clamp_page(page: usize, total_items: usize, items_per_page: usize) -> usize {
    page.clamp(1, total_pages(total_items, items_per_page).max(1))
}

/// Slice bounds of the visible page, half-open over the filtered view.
pub fn page_bounds(
    current_page: usize,
    total_items: usize,
    items_per_page: usize,
) -> (usize, usize) {
    let page = clamp_page(current_page, total_items, items_per_page);
    let start = (page - 1) * items_per_page;
    let end = (start + items_per_page).min(total_items);
    (start.min(total_items), end)
}

/// Computes the pagination links, or `None` when one page (or none)
/// exists and the pagination UI should stay hidden. An out-of-range
/// `current_page` is clamped silently.
pub fn page_window(
    current_page: usize,
    total_items: usize,
    items_per_page: usize,
    max_links: usize,
) -> Option<PageWindow> {
    let total_pages = total_pages(total_items, items_per_page);
    if total_pages <= 1 || max_links == 0 {
        return None;
    }

    let current = current_page.clamp(1, total_pages);
    let mut start = current.saturating_sub(max_links / 2).max(1);
    let mut end = start + max_links - 1;
    if end > total_pages {
        end = total_pages;
        start = end.saturating_sub(max_links - 1).max(1);
    }

    Some(PageWindow {
        total_pages,
        pages: (start..=end).collect(),
        show_first: start > 1,
        leading_gap: start > 2,
        show_last: end < total_pages,
        trailing_gap: end < total_pages - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, page_bounds, page_window, total_pages};

    #[test]
    fn single_page_hides_pagination() {
        assert!(page_window(1, 10, 10, 5).is_none());
        assert!(page_window(1, 0, 10, 5).is_none());
    }

    #[test]
    fn small_total_shows_every_page() {
        let window = page_window(2, 35, 10, 5).expect("window");
        assert_eq!(window.pages, vec![1, 2, 3, 4]);
        assert!(!window.show_first);
        assert!(!window.show_last);
    }

    #[test]
    fn interior_page_is_centered_with_exact_width() {
        let window = page_window(10, 200, 10, 5).expect("window");
        assert_eq!(window.pages, vec![8, 9, 10, 11, 12]);
        assert!(window.pages.contains(&10));
        assert!(window.show_first);
        assert!(window.leading_gap);
        assert!(window.show_last);
        assert!(window.trailing_gap);
    }

    #[test]
    fn window_shifts_down_at_the_tail() {
        let window = page_window(20, 200, 10, 5).expect("window");
        assert_eq!(window.pages, vec![16, 17, 18, 19, 20]);
        assert!(window.show_first);
        assert!(!window.show_last);
    }

    #[test]
    fn window_clamps_at_the_head() {
        let window = page_window(1, 200, 10, 5).expect("window");
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(window.show_last);
        assert!(window.trailing_gap);
    }

    #[test]
    fn affordance_gap_collapses_when_adjacent() {
        // Window [2..6] of 7: page 1 is adjacent, so no leading ellipsis.
        let window = page_window(4, 70, 10, 5).expect("window");
        assert_eq!(window.pages, vec![2, 3, 4, 5, 6]);
        assert!(window.show_first);
        assert!(!window.leading_gap);
        assert!(window.show_last);
        assert!(!window.trailing_gap);
    }

    #[test]
    fn out_of_range_page_clamps_silently() {
        let window = page_window(99, 30, 10, 5).expect("window");
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert_eq!(clamp_page(99, 30, 10), 3);
        assert_eq!(clamp_page(0, 30, 10), 1);
    }

    #[test]
    fn page_bounds_slice_the_filtered_view() {
        assert_eq!(page_bounds(1, 35, 10), (0, 10));
        assert_eq!(page_bounds(4, 35, 10), (30, 35));
        assert_eq!(page_bounds(9, 35, 10), (30, 35));
        assert_eq!(page_bounds(1, 0, 10), (0, 0));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
