//! Shared response bodies for the API surface.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Standard error body for every rejection in this layer: `{ "msg": ... }`.
///
/// The status code travels in the HTTP response line, not the body.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason, safe for client display.
    pub msg: Cow<'static, str>,
    /// HTTP status code (not serialized in JSON).
    #[serde(skip, default = "default_status")]
    pub status: StatusCode,
}

fn default_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

impl ErrorResponse {
    /// Creates a new error response.
    #[inline]
    pub const fn new(status: StatusCode, msg: Cow<'static, str>) -> Self {
        Self { msg, status }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Confirmation body for endpoints that only report a message, such as
/// listing deletion.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub msg: Cow<'static, str>,
}

impl MessageResponse {
    /// Creates a new message response.
    #[inline]
    pub const fn new(msg: Cow<'static, str>) -> Self {
        Self { msg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_to_msg_only() {
        let response = ErrorResponse::new(StatusCode::NOT_FOUND, "Book not found".into());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "msg": "Book not found" }));
    }
}
