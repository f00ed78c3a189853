//! Response types
//!
//! Standardized list-response structures for the API. The error/success
//! envelope lives in [`crate::error::ApiResponse`].

use serde::{Deserialize, Serialize};

/// A page of results with pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The page of items
    pub data: Vec<T>,
    /// Total number of matching items across all pages
    pub total: i64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size used for this query
    pub per_page: u32,
    /// Total number of pages
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    /// Build a page from items plus the total count
    pub fn new(data: Vec<T>, total: i64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total_pages = ((total.max(0) as u64).div_ceil(per_page as u64)) as u32;
        Self {
            data,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
