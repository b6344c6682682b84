//! # Error Types
//!
//! Typed error handling for the ShopHub storefront.
//! All fallible operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type shared across the storefront crates
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed client input, with field-level detail
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout requested with no cart items
    #[error("Cart is empty")]
    EmptyCart,

    /// Product not found in catalog
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: i32 },

    /// Requested quantity exceeds current stock
    #[error("Insufficient stock for {name}")]
    InsufficientStock { product_id: i32, name: String },

    /// Email already registered
    #[error("User already exists")]
    AlreadyExists,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, or expired bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (admin-only capability)
    #[error("Forbidden")]
    Forbidden,

    /// Generic resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Configuration(_) => 500,
            ShopError::Validation(_) => 400,
            ShopError::EmptyCart => 400,
            ShopError::ProductNotFound { .. } => 404,
            ShopError::InsufficientStock { .. } => 400,
            ShopError::AlreadyExists => 400,
            ShopError::InvalidCredentials => 401,
            ShopError::Unauthorized(_) => 401,
            ShopError::Forbidden => 403,
            ShopError::NotFound(_) => 404,
            ShopError::Provider { .. } => 502,
            ShopError::Network(_) => 503,
            ShopError::WebhookVerification(_) => 401,
            ShopError::WebhookParse(_) => 400,
            ShopError::Database(_) => 500,
            ShopError::Serialization(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Whether the error detail is safe to show to the client.
    ///
    /// Infrastructure failures are logged server-side and reported opaquely;
    /// resource and validation errors carry identifying detail.
    pub fn is_client_safe(&self) -> bool {
        !matches!(
            self,
            ShopError::Configuration(_)
                | ShopError::Provider { .. }
                | ShopError::Network(_)
                | ShopError::Database(_)
                | ShopError::Serialization(_)
                | ShopError::Internal(_)
        )
    }
}

impl From<sqlx::Error> for ShopError {
    fn from(err: sqlx::Error) -> Self {
        ShopError::Database(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
