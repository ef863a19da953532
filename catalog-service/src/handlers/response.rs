//! Response envelopes
//!
//! Single records are returned as bare JSON. Lists are wrapped in a
//! [`ListResponse`]:
//!
//! ```json
//! { "data": [...], "pagination": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::query::PageRequest;

/// Pagination block of a list response
///
/// ```rust
/// use catalog_service::handlers::PaginationMeta;
/// use catalog_service::query::PageRequest;
///
/// let meta = PaginationMeta::new(PageRequest::resolve(Some("2"), Some("20")), 50);
/// assert_eq!(meta.total_pages, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page, 1-indexed
    pub page: u32,
    pub limit: u32,
    /// Records matching the filter across all pages
    pub total: u64,
    /// `ceil(total / limit)`
    pub total_pages: u64,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(page: PageRequest, total: u64) -> Self {
        Self {
            page: page.page(),
            limit: page.limit(),
            total,
            total_pages: page.total_pages(total),
        }
    }
}

/// A page of records with its pagination block
///
/// `data` and `pagination.total` come from two separate reads and may
/// disagree under concurrent writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { data, pagination }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::resolve(None, Some("10"));
        assert_eq!(PaginationMeta::new(page, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(page, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(page, 11).total_pages, 2);
    }

    #[test]
    fn test_envelope_shape() {
        let page = PageRequest::resolve(Some("2"), Some("2"));
        let response = ListResponse::new(vec!["a", "b"], PaginationMeta::new(page, 5));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": ["a", "b"],
                "pagination": { "page": 2, "limit": 2, "total": 5, "totalPages": 3 }
            })
        );
    }
}
