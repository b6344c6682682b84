//! HTTP request handlers.

pub mod auth;
pub mod orders;
pub mod products;
pub mod webhook;

use axum::response::IntoResponse;
use axum::Json;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shophub",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
