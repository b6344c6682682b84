//! # Application State
//!
//! Shared state for the axum application: configuration, database pool,
//! auth service, and the payment strategy. Built once at startup and passed
//! explicitly; nothing reads the environment after construction.

use crate::services::AuthService;
use shop_core::{BoxedPaymentStrategy, CheckoutUrls, ShopError, ShopResult};
use sqlx::PgPool;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Base URL of the frontend (checkout redirect targets)
    pub frontend_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`.
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ShopError::Configuration("DATABASE_URL not set".to_string()))?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ShopError::Configuration("JWT_SECRET not set".to_string()))?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            database_url,
            jwt_secret,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Socket address to bind to
    pub fn socket_addr(&self) -> ShopResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("invalid bind address: {e}")))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database pool
    pub pool: PgPool,
    /// Auth service (password hashing, tokens)
    pub auth: AuthService,
    /// Hosted-payment provider
    pub payment: BoxedPaymentStrategy,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool, payment: BoxedPaymentStrategy) -> Self {
        let auth = AuthService::new(&config.jwt_secret);
        let urls = CheckoutUrls::new(&config.frontend_url);

        Self {
            pool,
            auth,
            payment,
            urls,
            config,
        }
    }
}
