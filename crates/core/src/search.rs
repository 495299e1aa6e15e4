//! Pagination helpers shared by every list endpoint.
//!
//! Public listings use `limit`/`offset`; the admin screens page in fixed
//! blocks of [`ADMIN_PAGE_SIZE`] and report a page count alongside the rows.

use serde::Serialize;

/// Default page size for public list endpoints.
pub const DEFAULT_LIMIT: i64 = 24;

/// Maximum page size for public list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Fixed page size used by the admin works and users screens.
pub const ADMIN_PAGE_SIZE: i64 = 10;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// A 1-based page request resolved into `LIMIT`/`OFFSET` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Resolve a 1-based page number. Pages below 1 are treated as page 1.
    pub fn new(page: Option<i64>, per_page: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        Self {
            page,
            limit: per_page,
            offset: (page - 1) * per_page,
        }
    }
}

/// Number of pages needed to show `total` rows. Always at least 1 so the
/// UI can render "1 / 1" for an empty table.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// Paged result envelope: rows plus enough metadata to render pagination.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            items,
            total,
            page: window.page,
            total_pages: total_pages(total, window.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_rejects_negative() {
        assert_eq!(clamp_offset(Some(-10)), 0);
    }

    // -- PageWindow ----------------------------------------------------------

    #[test]
    fn first_page_starts_at_zero() {
        let w = PageWindow::new(None, ADMIN_PAGE_SIZE);
        assert_eq!(w, PageWindow { page: 1, limit: 10, offset: 0 });
    }

    #[test]
    fn third_page_skips_two_blocks() {
        let w = PageWindow::new(Some(3), ADMIN_PAGE_SIZE);
        assert_eq!(w.offset, 20);
        assert_eq!(w.limit, 10);
    }

    #[test]
    fn page_zero_is_page_one() {
        assert_eq!(PageWindow::new(Some(0), 10).page, 1);
    }

    // -- total_pages ---------------------------------------------------------

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
    }

    #[test]
    fn total_pages_is_one_for_empty_table() {
        assert_eq!(total_pages(0, 10), 1);
    }
}
