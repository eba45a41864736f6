//! Page-number windowing for list controls.
//!
//! Long listings show the first page, a window around the current page, the
//! last two pages, and ellipses for the gaps in between:
//!
//! ```text
//! current 1 of 10:   1 [2] ... 9 10
//! current 5 of 10:   1 ... 4 [5] 6 ... 9 10
//! current 10 of 10:  1 ... 9 [10]
//! ```
//!
//! When the window starts at page 3, page 2 is rendered instead of a
//! leading ellipsis.

/// One control in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// A 1-based page button
    Page(u32),
    /// Elided pages
    Ellipsis,
}

impl PageControl {
    pub fn page(&self) -> Option<u32> {
        match self {
            PageControl::Page(n) => Some(*n),
            PageControl::Ellipsis => None,
        }
    }
}

/// Keeps `page` within `1..=total`, treating an empty listing as one page.
///
/// # Examples
///
/// ```rust
/// use titanwiki::pagination::clamp_page;
///
/// assert_eq!(clamp_page(0, 10), 1);
/// assert_eq!(clamp_page(12, 10), 10);
/// assert_eq!(clamp_page(3, 0), 1);
/// ```
pub fn clamp_page(page: u32, total: u32) -> u32 {
    page.clamp(1, total.max(1))
}

/// Computes the controls to render for `current` out of `total` pages.
///
/// Up to five pages are listed in full. Beyond that, page 1 and the last
/// page are always present, with the current page and its neighbours in
/// between. `current` is clamped into range first.
///
/// # Examples
///
/// ```rust
/// use titanwiki::pagination::{PageControl::{self, Ellipsis, Page}, page_window};
///
/// assert_eq!(
///     page_window(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(9), Page(10)]
/// );
/// assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
/// assert!(page_window(1, 0).is_empty());
/// ```
pub fn page_window(current: u32, total: u32) -> Vec<PageControl> {
    if total <= 5 {
        return (1..=total).map(PageControl::Page).collect();
    }

    let current = clamp_page(current, total);
    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);

    let mut controls = vec![PageControl::Page(1)];

    match start {
        3 => controls.push(PageControl::Page(2)),
        s if s > 3 => controls.push(PageControl::Ellipsis),
        _ => {}
    }

    controls.extend((start..=end).map(PageControl::Page));

    // `end` never exceeds `total - 1`
    let gap = total - end;
    if gap == 2 {
        controls.push(PageControl::Page(total - 1));
    } else if gap > 2 {
        controls.push(PageControl::Ellipsis);
        controls.push(PageControl::Page(total - 1));
    }

    controls.push(PageControl::Page(total));
    controls
}

#[cfg(test)]
mod tests {
    use super::PageControl::{Ellipsis, Page};
    use super::*;

    fn assert_well_formed(controls: &[PageControl], total: u32) {
        let pages: Vec<u32> = controls.iter().filter_map(PageControl::page).collect();

        assert!(
            pages.windows(2).all(|w| w[0] < w[1]),
            "pages not strictly increasing: {controls:?}"
        );
        assert!(pages.iter().all(|&p| (1..=total).contains(&p)));
        assert!(
            !controls
                .windows(2)
                .any(|w| w[0] == Ellipsis && w[1] == Ellipsis),
            "adjacent ellipses: {controls:?}"
        );
        if total > 0 {
            assert_eq!(pages.first(), Some(&1));
            assert_eq!(pages.last(), Some(&total));
        }
    }

    #[test]
    fn test_small_totals_list_every_page() {
        for total in 0..=5 {
            let controls = page_window(1, total);
            let expected: Vec<_> = (1..=total).map(Page).collect();
            assert_eq!(controls, expected);
        }
    }

    #[test]
    fn test_first_page_of_ten() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Ellipsis, Page(9), Page(10)]
        );
    }

    #[test]
    fn test_middle_page_of_ten() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(9), Page(10)]
        );
    }

    #[test]
    fn test_boundaries_of_ten() {
        assert_eq!(page_window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(
            page_window(4, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(9), Page(10)]
        );
        assert_eq!(
            page_window(7, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        assert_eq!(page_window(0, 10), page_window(1, 10));
        assert_eq!(page_window(99, 10), page_window(10, 10));
    }

    #[test]
    fn test_totals_up_to_one_have_no_ellipsis() {
        assert!(page_window(1, 0).is_empty());
        assert_eq!(page_window(1, 1), vec![Page(1)]);
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let max = u32::MAX;
        assert_eq!(page_window(max, max), vec![Page(1), Ellipsis, Page(max - 1), Page(max)]);
        assert_eq!(
            page_window(max - 2, max),
            vec![Page(1), Ellipsis, Page(max - 3), Page(max - 2), Page(max - 1), Page(max)]
        );
        for total in [max - 3, max - 1, max] {
            for current in [0, 1, 2, 3, total / 2, total - 3, total - 2, total - 1, total, max] {
                assert_well_formed(&page_window(current, total), total);
            }
        }
    }

    #[test]
    fn test_every_window_is_well_formed() {
        for total in 0..=40 {
            for current in 0..=total + 1 {
                assert_well_formed(&page_window(current, total), total);
            }
        }
    }
}
