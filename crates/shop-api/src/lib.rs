//! # shop-api
//!
//! HTTP API layer for shophub-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for auth, catalog and checkout
//! - Webhook handler for payment events
//! - PostgreSQL persistence via sqlx
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/auth/register` | Create an account |
//! | POST | `/api/auth/login` | Exchange credentials for a token |
//! | GET | `/api/products` | List products |
//! | GET | `/api/products/:id` | Get product |
//! | POST | `/api/products` | Create product (admin) |
//! | POST | `/api/orders/create-checkout-session` | Create order + checkout session |
//! | GET | `/api/orders/my-orders` | Caller's order history |
//! | POST | `/webhook/stripe` | Stripe webhook |

pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
