//! Request types for the shared crate
//!
//! Common list-query parameters used across the API.

/// Pagination, ordering and search parameters for list endpoints
///
/// Kept flat (no nested structs) so it deserializes cleanly from a query
/// string.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ListQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 15, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Sort field (whitelisted per endpoint, default: id)
    #[serde(default = "default_sort_field")]
    pub sort_by: String,

    /// Sort order (asc or desc, default: asc)
    #[serde(default = "default_sort_order")]
    pub order: String,

    /// Search keyword
    #[serde(default)]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            sort_by: default_sort_field(),
            order: default_sort_order(),
            search: None,
        }
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    15
}

pub(crate) fn default_sort_field() -> String {
    "id".to_string()
}

pub(crate) fn default_sort_order() -> String {
    "asc".to_string()
}

impl ListQuery {
    /// Get the offset for database queries
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) as u64 * self.limit() as u64
    }

    /// Get the limit (clamped to max 100)
    pub fn limit(&self) -> u32 {
        std::cmp::min(self.per_page.max(1), 100)
    }

    /// Get sort direction (true for desc, false for asc)
    pub fn is_descending(&self) -> bool {
        self.order.eq_ignore_ascii_case("desc")
    }
}
