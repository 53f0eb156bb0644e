//! Shared pagination utilities
//!
//! List endpoints accept `page` and `page_size` query parameters and
//! return `total / per_page / current_page / last_page` metadata next to
//! the records.

use serde::{Deserialize, Serialize};

/// Common pagination request parameters
///
/// Defaults to page 1 with 20 items; `page_size` is clamped to 1-100.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to 20, clamped to 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// Page number (1-indexed), defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, defaulting to 20 and clamped to 1-100
    pub fn per_page(&self) -> i64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    /// Offset for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMetadata {
    /// Total number of records across all pages
    pub total: i64,

    /// Items per page
    pub per_page: i64,

    /// Current page number (1-indexed)
    pub current_page: i64,

    /// Number of the last page (0 when there are no records)
    pub last_page: i64,
}

impl PaginationMetadata {
    pub fn new(current_page: i64, per_page: i64, total: i64) -> Self {
        let last_page = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            total,
            per_page,
            current_page,
            last_page,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}

/// Generic container for one page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_custom() {
        let params = PaginationParams::new(Some(3), Some(50));
        assert_eq!(params.page(), 3);
        assert_eq!(params.per_page(), 50);
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams::new(Some(-1), Some(200));
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 100);
    }

    #[test]
    fn test_metadata() {
        let meta = PaginationMetadata::new(2, 10, 25);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.per_page, 10);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 3);
    }

    #[test]
    fn test_metadata_empty() {
        let meta = PaginationMetadata::new(1, 20, 0);
        assert_eq!(meta.last_page, 0);
    }

    #[test]
    fn test_metadata_exact_boundary() {
        let meta = PaginationMetadata::new(1, 20, 40);
        assert_eq!(meta.last_page, 2);
    }
}
