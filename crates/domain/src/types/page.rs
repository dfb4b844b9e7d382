//! Pagination metadata and the server response envelope
//!
//! [`PageInfo`] is always normalised from `(total, page, limit)`, so the
//! derived fields cannot disagree with each other even when the server sends
//! inconsistent values.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, FIRST_PAGE};

/// Pagination metadata for one fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPageInfo")]
pub struct PageInfo {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Build pagination metadata with `total_pages = ceil(total / limit)`.
    ///
    /// A zero `limit` yields zero pages.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > FIRST_PAGE,
        }
    }

    /// Metadata for a screen that has not fetched anything yet.
    pub fn empty(limit: u64) -> Self {
        Self::new(0, FIRST_PAGE, limit)
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::empty(DEFAULT_PAGE_SIZE)
    }
}

/// Wire form; derived fields are ignored and recomputed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageInfo {
    #[serde(default)]
    total: u64,
    #[serde(default = "first_page")]
    page: u64,
    #[serde(default = "default_limit", alias = "size")]
    limit: u64,
}

fn first_page() -> u64 {
    FIRST_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl From<RawPageInfo> for PageInfo {
    fn from(raw: RawPageInfo) -> Self {
        Self::new(raw.total, raw.page, raw.limit)
    }
}

/// One page of items plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: PageInfo) -> Self {
        Self { items, pagination }
    }

    /// Wrap a single non-paginated value.
    pub fn single(item: T) -> Self {
        Self { items: vec![item], pagination: PageInfo::new(1, FIRST_PAGE, 1) }
    }
}

/// `{success, data, message, timestamp}` envelope wrapping every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None, timestamp: None }
    }

    pub fn empty() -> Self {
        Self { success: true, data: None, message: None, timestamp: None }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let info = PageInfo::new(21, 2, 10);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);

        let last = PageInfo::new(21, 3, 10);
        assert!(!last.has_next);
    }

    #[test]
    fn zero_limit_and_empty_results() {
        assert_eq!(PageInfo::new(5, 1, 0).total_pages, 0);

        let empty = PageInfo::empty(10);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn decoding_recomputes_derived_fields() {
        let info: PageInfo = serde_json::from_value(json!({
            "total": 45, "page": 1, "size": 20, "totalPages": 99, "hasNext": false, "hasPrev": true
        }))
        .unwrap();

        assert_eq!(info, PageInfo::new(45, 1, 20));
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn envelope_without_data_decodes() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_value(json!({ "success": true, "message": "Logged out" })).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Logged out"));
    }

    #[test]
    fn paged_envelope_decodes_with_and_without_data() {
        let failed: ApiEnvelope<Page<u64>> =
            serde_json::from_value(json!({ "success": false, "message": "Forbidden" })).unwrap();
        assert!(failed.data.is_none());

        let listed: ApiEnvelope<Page<u64>> = serde_json::from_value(json!({
            "success": true,
            "data": { "items": [7, 8], "pagination": { "total": 2, "page": 1, "limit": 10 } }
        }))
        .unwrap();
        assert_eq!(listed.data.map(|page| page.items), Some(vec![7, 8]));
    }
}
