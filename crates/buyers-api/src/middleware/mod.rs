//! HTTP middleware
//!
//! Request-id tagging, access logging, panic recovery and a JSON content-type
//! default are stacked around the whole router; pagination is attached to the
//! list routes only. The URL format rewrite has to run before route matching,
//! so it wraps the routed service rather than being layered onto it.

use crate::error::ErrResponse;
use axum::{
    extract::Request,
    http::{header, uri::PathAndQuery, HeaderValue, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, error, Span};

/// Header carrying the per-request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Pagination placeholder for list routes.
///
/// Forwards the request unchanged; no query parameters are read and the
/// listing is never sliced.
pub async fn paginate(request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Drop a format extension (`.json`) from the last path segment before routing.
///
/// `/products.json` routes as `/products` and `/realbuyers/ip/b2.json` binds
/// `buyer_id = b2`. The query string is kept.
pub async fn url_format(mut request: Request, next: Next) -> Response {
    if let Some(uri) = strip_format(request.uri()) {
        debug!(from = %request.uri(), to = %uri, "stripped url format");
        *request.uri_mut() = uri;
    }
    next.run(request).await
}

/// Path with its format extension removed, or `None` when there is none
fn strip_format(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    let base = path.rfind('/').map_or(0, |i| i + 1);
    let dot = path[base..].rfind('.')?;
    if dot == 0 {
        return None;
    }

    let stripped = &path[..base + dot];
    let path_and_query = match uri.query() {
        Some(query) => format!("{stripped}?{query}"),
        None => stripped.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

/// Span for the access log, tagged with the request id
pub fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Turn a handler panic into a 500 error envelope
pub fn recover_from_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "handler panicked");
    ErrResponse::internal().into_response()
}

/// Default content type for every response
pub fn json_content_type() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// CORS for the configured origins; `None` when no origin is configured
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
