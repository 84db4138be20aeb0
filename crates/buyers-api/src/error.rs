//! API error responses
//!
//! Every failure a client sees is one of a handful of fixed envelopes:
//! a user-facing status line plus an optional application code and message.
//!
//! Author: Buyers API Team

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use buyers_core::BuyersError;
use serde::Serialize;
use std::fmt::Display;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrResponse {
    /// HTTP status code, not part of the body
    #[serde(skip)]
    pub http_status: u16,

    /// User-level status message
    #[serde(rename = "status")]
    #[schema(example = "Resource not found.")]
    pub status_text: String,

    /// Application-specific error code
    #[serde(rename = "code", skip_serializing_if = "Option::is_none")]
    pub app_code: Option<i64>,

    /// Application-level error message, for debugging
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

impl ErrResponse {
    fn new(status: StatusCode, status_text: &str) -> Self {
        Self {
            http_status: status.as_u16(),
            status_text: status_text.to_string(),
            app_code: None,
            error_text: None,
        }
    }

    fn with_error(mut self, err: impl Display) -> Self {
        self.error_text = Some(err.to_string());
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.app_code = Some(code);
        self
    }

    /// 400 - malformed request
    pub fn invalid_request(err: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request.").with_error(err)
    }

    /// 422 - response could not be serialized
    pub fn render(err: impl Display) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Error rendering response.").with_error(err)
    }

    /// 404 - no underlying error is attached
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Resource not found.")
    }

    /// 405 - the path exists but not for this method
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
    }

    /// 502 - a request-time graph query failed
    pub fn graph(err: impl Display) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "Error querying graph store.").with_error(err)
    }

    /// 500 - a handler panicked
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<BuyersError> for ErrResponse {
    fn from(err: BuyersError) -> Self {
        match err {
            BuyersError::NotFound(_) => ErrResponse::not_found(),
            other => ErrResponse::graph(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_has_no_error_text() {
        let err = ErrResponse::not_found();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "Resource not found."})
        );
    }

    #[test]
    fn test_invalid_request_carries_message() {
        let err = ErrResponse::invalid_request("missing required Buyer fields.");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "Invalid request.", "error": "missing required Buyer fields."})
        );
    }

    #[test]
    fn test_render_with_code() {
        let err = ErrResponse::render("boom").with_code(7);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["status"], "Error rendering response.");
        assert_eq!(body["code"], 7);
        assert_eq!(body["error"], "boom");
    }

    #[test]
    fn test_from_buyers_error() {
        let err = ErrResponse::from(BuyersError::NotFound("realbuyer".to_string()));
        assert_eq!(err, ErrResponse::not_found());

        let err = ErrResponse::from(BuyersError::GraphUnavailable("refused".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.error_text.unwrap().contains("refused"));
    }
}
