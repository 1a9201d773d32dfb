//! Page-window arithmetic, independent of the storage backend.
//!
//! Page 1 is always reachable, even when nothing matches. Any later page
//! must start inside the matching rows.
//!
//! ```rust
//! use domain_tasks::pagination::{build_meta, check_reachable, compute_window};
//!
//! let window = compute_window(3, 10).unwrap();
//! assert_eq!(window.offset, 20);
//!
//! check_reachable(3, window, 25).unwrap();
//! let meta = build_meta(3, window.limit, 25);
//! assert_eq!(meta.page_count, 3);
//! assert!(!meta.has_next_page);
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Larger requested limits are clamped to this.
pub const MAX_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be a positive integer, got {0}")]
    InvalidPage(u64),

    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(u64),

    #[error("no items match; page {page} is unreachable")]
    NoItems { page: u64 },

    #[error("page {page} exceeds maximum page {max_page}")]
    PageExceeded { page: u64, max_page: u64 },
}

impl PageError {
    /// Bounds failures, as opposed to malformed inputs.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::NoItems { .. } | Self::PageExceeded { .. })
    }
}

/// Offset/limit for a 1-based page number.
pub fn compute_window(page: u64, limit: u64) -> Result<PageWindow, PageError> {
    if page == 0 {
        return Err(PageError::InvalidPage(page));
    }
    if limit == 0 {
        return Err(PageError::InvalidLimit(limit));
    }

    let limit = limit.min(MAX_PAGE_SIZE);
    Ok(PageWindow {
        offset: (page - 1).saturating_mul(limit),
        limit,
    })
}

pub fn page_count(item_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    item_count.div_ceil(limit)
}

/// Rejects windows that start past the matching rows.
pub fn check_reachable(page: u64, window: PageWindow, item_count: u64) -> Result<(), PageError> {
    if item_count == 0 {
        return if page > 1 {
            Err(PageError::NoItems { page })
        } else {
            Ok(())
        };
    }

    if window.offset >= item_count {
        return Err(PageError::PageExceeded {
            page,
            max_page: page_count(item_count, window.limit),
        });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct PageMeta {
    pub page: u64,
    /// Effective limit after clamping
    pub page_size: u64,
    /// Matching rows across all pages
    pub item_count: u64,
    pub page_count: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

pub fn build_meta(page: u64, limit: u64, item_count: u64) -> PageMeta {
    let page_count = page_count(item_count, limit);
    PageMeta {
        page,
        page_size: limit,
        item_count,
        page_count,
        has_previous_page: page > 1,
        has_next_page: page < page_count,
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_offsets() {
        assert_eq!(
            compute_window(1, 10).unwrap(),
            PageWindow { offset: 0, limit: 10 }
        );
        assert_eq!(
            compute_window(4, 25).unwrap(),
            PageWindow { offset: 75, limit: 25 }
        );
    }

    #[test]
    fn test_window_clamps_limit() {
        let window = compute_window(2, 500).unwrap();
        assert_eq!(window.limit, MAX_PAGE_SIZE);
        assert_eq!(window.offset, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_window_rejects_zero() {
        assert_eq!(compute_window(0, 10), Err(PageError::InvalidPage(0)));
        assert_eq!(compute_window(1, 0), Err(PageError::InvalidLimit(0)));
        assert!(!PageError::InvalidPage(0).is_out_of_range());
    }

    #[test]
    fn test_huge_page_saturates_instead_of_overflowing() {
        let window = compute_window(u64::MAX, 50).unwrap();
        assert_eq!(window.offset, u64::MAX);
        assert!(check_reachable(u64::MAX, window, 10).is_err());
    }

    #[test]
    fn test_first_page_of_nothing_is_empty_not_error() {
        let window = compute_window(1, 10).unwrap();
        assert!(check_reachable(1, window, 0).is_ok());

        let meta = build_meta(1, 10, 0);
        assert_eq!(meta.page_count, 0);
        assert!(!meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_second_page_of_nothing_is_out_of_range() {
        let window = compute_window(2, 10).unwrap();
        let err = check_reachable(2, window, 0).unwrap_err();
        assert_eq!(err, PageError::NoItems { page: 2 });
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_page_past_the_end_cites_max_page() {
        let window = compute_window(4, 10).unwrap();
        let err = check_reachable(4, window, 25).unwrap_err();
        assert_eq!(err, PageError::PageExceeded { page: 4, max_page: 3 });
        assert_eq!(err.to_string(), "page 4 exceeds maximum page 3");
    }

    #[test]
    fn test_last_partial_page() {
        let window = compute_window(3, 10).unwrap();
        assert!(check_reachable(3, window, 25).is_ok());

        let meta = build_meta(3, window.limit, 25);
        assert_eq!(meta.page_count, 3);
        assert!(meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_exact_multiple_boundary() {
        let window = compute_window(3, 10).unwrap();
        assert!(check_reachable(3, window, 20).is_err());
        assert!(build_meta(1, 10, 20).has_next_page);
        assert!(!build_meta(2, 10, 20).has_next_page);
    }

    #[test]
    fn test_page_map_keeps_meta() {
        let page = Page {
            data: vec![1, 2, 3],
            meta: build_meta(1, 10, 3),
        };
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.data, vec![2, 4, 6]);
        assert_eq!(mapped.meta.item_count, 3);
    }
}
