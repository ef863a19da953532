//! Request ID generation and propagation
//!
//! Every request gets an `x-request-id` of the form `req_<uuid v7>` unless
//! the caller already supplied one. The id is echoed back on the response
//! and credentials are masked in request logs.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

/// Prefix on generated request ids
pub const REQUEST_ID_PREFIX: &str = "req_";

/// Headers masked in trace output
pub const SENSITIVE_HEADERS: &[HeaderName] = &[
    axum::http::header::AUTHORIZATION,
    axum::http::header::COOKIE,
    axum::http::header::SET_COOKIE,
    axum::http::header::PROXY_AUTHORIZATION,
];

/// Generates time-sortable request ids, e.g. `req_01929c3a7e5b7c2d8f0e4a1b2c3d4e5f`
#[derive(Debug, Clone, Copy, Default)]
pub struct MakePrefixedRequestId;

impl MakePrefixedRequestId {
    pub fn generate() -> String {
        format!("{}{}", REQUEST_ID_PREFIX, Uuid::now_v7().simple())
    }
}

impl MakeRequestId for MakePrefixedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Self::generate()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Sets `x-request-id` on requests that arrive without one
pub fn request_id_layer() -> SetRequestIdLayer<MakePrefixedRequestId> {
    SetRequestIdLayer::x_request_id(MakePrefixedRequestId)
}

/// Copies `x-request-id` from the request onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(SENSITIVE_HEADERS.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
    }

    #[test]
    fn test_generated_id_format() {
        let id = MakePrefixedRequestId::generate();
        assert!(id.starts_with(REQUEST_ID_PREFIX));
        assert_eq!(id.len(), REQUEST_ID_PREFIX.len() + 32);
        assert!(Uuid::parse_str(&id[REQUEST_ID_PREFIX.len()..]).is_ok());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(
            MakePrefixedRequestId::generate(),
            MakePrefixedRequestId::generate()
        );
    }

    #[test]
    fn test_sensitive_headers_include_credentials() {
        assert!(SENSITIVE_HEADERS.contains(&axum::http::header::AUTHORIZATION));
        assert!(SENSITIVE_HEADERS.contains(&axum::http::header::COOKIE));
    }

    #[tokio::test]
    async fn test_response_carries_generated_id() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(id.starts_with(REQUEST_ID_PREFIX));
    }

    #[tokio::test]
    async fn test_incoming_id_is_kept() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "upstream-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "upstream-42");
    }
}
