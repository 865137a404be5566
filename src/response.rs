//! Standard list-response envelope

use serde::Serialize;

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: i64,
    /// Items per page
    pub limit: i64,
    /// Total number of items
    pub total: i64,
    /// Total number of pages
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit <= 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// Paginated response wrapper: `{ data, pagination }`
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(Pagination::new(1, 50, 0).pages, 0);
        assert_eq!(Pagination::new(1, 50, 50).pages, 1);
        assert_eq!(Pagination::new(1, 50, 51).pages, 2);
        assert_eq!(Pagination::new(1, 10, 95).pages, 10);
    }

    #[test]
    fn test_zero_limit_has_no_pages() {
        assert_eq!(Pagination::new(1, 0, 100).pages, 0);
    }

    #[test]
    fn test_envelope_shape() {
        let page = Paginated::new(vec![1, 2, 3], 2, 3, 7);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["limit"], 3);
        assert_eq!(json["pagination"]["total"], 7);
        assert_eq!(json["pagination"]["pages"], 3);
    }
}
