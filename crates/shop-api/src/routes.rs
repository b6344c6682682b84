//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Auth:
///   - POST /api/auth/register - Create an account
///   - POST /api/auth/login - Exchange credentials for a token
///
/// - Catalog:
///   - GET  /api/products - List all products
///   - GET  /api/products/{id} - Get product by ID
///   - POST /api/products - Create product (admin only)
///
/// - Orders:
///   - POST /api/orders/create-checkout-session - Create order + hosted checkout session
///   - GET  /api/orders/my-orders - Caller's order history
///
/// - Webhooks:
///   - POST /webhook/stripe - Stripe webhook handler
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the storefront frontend runs on its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Catalog
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/products/{product_id}", get(handlers::products::get_product))
        // Orders
        .route("/orders/create-checkout-session", post(handlers::orders::create_checkout_session))
        .route("/orders/my-orders", get(handlers::orders::my_orders));

    // Webhook routes (no CORS, must accept raw body)
    let webhook_routes = Router::new().route("/stripe", post(handlers::webhook::stripe_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
