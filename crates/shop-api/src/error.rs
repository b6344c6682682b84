//! HTTP error responses.
//!
//! Wraps `ShopError` for axum. Client-safe errors keep their detail;
//! infrastructure failures are logged server-side and reported opaquely.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shop_core::ShopError;
use tracing::error;

/// Error body returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Handler-level error type
#[derive(Debug)]
pub struct ApiError(pub ShopError);

impl<E: Into<ShopError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let code = err.status_code();

        let message = if err.is_client_safe() {
            err.to_string()
        } else {
            error!("request failed: {err}");
            "Internal server error".to_string()
        };

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(message, code))).into_response()
    }
}

/// Result alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;
