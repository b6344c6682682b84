//! Live-database tests.
//!
//! These run against a real PostgreSQL instance and are skipped when
//! `DATABASE_URL` is not set:
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost/shophub_test
//! cargo test -p shop-api --test db
//! ```
//!
//! Each test creates its own users and products (unique emails), so the
//! suite can run repeatedly against the same database.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal::Decimal;
use serde_json::json;
use shop_api::db::{self, OrderRepository, ProductRepository, UserRepository};
use shop_api::state::{AppConfig, AppState};
use shop_api::create_router;
use shop_core::{CartItem, OrderStatus, Product, ShopError, User};
use sqlx::PgPool;
use uuid::Uuid;

async fn live_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping live-database test");
        return None;
    };
    let pool = db::create_pool(&url).await.expect("connect to test database");
    db::MIGRATOR.run(&pool).await.expect("apply migrations");
    Some(pool)
}

fn server_with(pool: PgPool) -> TestServer {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        jwt_secret: "db-test-secret".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        environment: "test".to_string(),
    };
    let stripe = shop_stripe::StripeCheckoutStrategy::new(shop_stripe::StripeConfig::new(
        "sk_test_dummy",
        "whsec_dummy",
    ))
    .expect("stripe strategy");

    TestServer::new(create_router(AppState::new(config, pool, Arc::new(stripe))))
        .expect("test server")
}

fn unique_email(tag: &str) -> String {
    format!("{tag}-{}@example.com", Uuid::new_v4().simple())
}

async fn create_user(pool: &PgPool, tag: &str) -> User {
    UserRepository::new(pool)
        .create(&unique_email(tag), "$2b$04$unused-hash", "Test User")
        .await
        .expect("create user")
}

async fn create_product(pool: &PgPool, price: Decimal, stock: i32) -> Product {
    ProductRepository::new(pool)
        .create("Widget", Some("A widget"), price, stock, None, Some("gadgets"))
        .await
        .expect("create product")
}

async fn order_count(pool: &PgPool, user_id: i32) -> i64 {
    sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count orders")
        .0
}

async fn stock_of(pool: &PgPool, product_id: i32) -> i32 {
    ProductRepository::new(pool)
        .find(product_id)
        .await
        .expect("find product")
        .expect("product exists")
        .stock_quantity
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let Some(pool) = live_pool().await else { return };
    let server = server_with(pool);
    let email = unique_email("dup");

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": "hunter22", "full_name": "Ada" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    // Same address, different case
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email.to_uppercase(), "password": "hunter22", "full_name": "Ada" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn duplicate_insert_hits_the_unique_backstop() {
    let Some(pool) = live_pool().await else { return };
    let users = UserRepository::new(&pool);
    let email = unique_email("race");

    users.create(&email, "hash-a", "First").await.unwrap();

    // A concurrent registration that slipped past the pre-check lands here;
    // the LOWER(email) index must reject it as AlreadyExists, not as an
    // opaque database failure, even when the case differs
    let err = users
        .create(&email.to_uppercase(), "hash-b", "Second")
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::AlreadyExists));
}

#[tokio::test]
async fn failed_checkout_persists_nothing() {
    let Some(pool) = live_pool().await else { return };
    let user = create_user(&pool, "failed-checkout").await;
    let in_stock = create_product(&pool, Decimal::new(999, 2), 5).await;
    let scarce = create_product(&pool, Decimal::new(2500, 2), 1).await;
    let orders = OrderRepository::new(&pool);

    let err = orders
        .create_pending(user.id, &[], "1 Main St")
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::EmptyCart));

    let cart = [
        CartItem { product_id: in_stock.id, quantity: 1 },
        CartItem { product_id: -1, quantity: 1 },
    ];
    let err = orders.create_pending(user.id, &cart, "1 Main St").await.unwrap_err();
    assert!(matches!(err, ShopError::ProductNotFound { product_id: -1 }));

    let cart = [
        CartItem { product_id: in_stock.id, quantity: 1 },
        CartItem { product_id: scarce.id, quantity: 2 },
    ];
    let err = orders.create_pending(user.id, &cart, "1 Main St").await.unwrap_err();
    assert!(matches!(err, ShopError::InsufficientStock { .. }));

    // Nothing persisted, no stock consumed
    assert_eq!(order_count(&pool, user.id).await, 0);
    assert_eq!(stock_of(&pool, in_stock.id).await, 5);
    assert_eq!(stock_of(&pool, scarce.id).await, 1);
}

#[tokio::test]
async fn order_total_comes_from_catalog_prices() {
    let Some(pool) = live_pool().await else { return };
    let user = create_user(&pool, "pricing").await;
    let product = create_product(&pool, Decimal::new(1999, 2), 5).await;
    let orders = OrderRepository::new(&pool);

    let created = orders
        .create_pending(user.id, &[CartItem { product_id: product.id, quantity: 2 }], "1 Main St")
        .await
        .unwrap();
    assert_eq!(created.total_amount, Decimal::new(3998, 2));

    let listed = orders.list_for_user(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let order = &listed[0];
    assert_eq!(order.id, created.order_id);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Decimal::new(3998, 2));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].product_id, product.id);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].price_at_purchase, Decimal::new(1999, 2));

    assert_eq!(stock_of(&pool, product.id).await, 3);
}

#[tokio::test]
async fn order_history_is_per_user() {
    let Some(pool) = live_pool().await else { return };
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let product = create_product(&pool, Decimal::new(500, 2), 10).await;
    let orders = OrderRepository::new(&pool);

    let a_order = orders
        .create_pending(alice.id, &[CartItem { product_id: product.id, quantity: 1 }], "A St")
        .await
        .unwrap();
    let b_order = orders
        .create_pending(bob.id, &[CartItem { product_id: product.id, quantity: 2 }], "B St")
        .await
        .unwrap();

    let a_list = orders.list_for_user(alice.id).await.unwrap();
    assert_eq!(a_list.len(), 1);
    assert_eq!(a_list[0].id, a_order.order_id);
    assert!(a_list.iter().all(|o| o.user_id == alice.id));

    let b_list = orders.list_for_user(bob.id).await.unwrap();
    assert_eq!(b_list.len(), 1);
    assert_eq!(b_list[0].id, b_order.order_id);
}

#[tokio::test]
async fn paid_transition_is_idempotent() {
    let Some(pool) = live_pool().await else { return };
    let user = create_user(&pool, "paid").await;
    let product = create_product(&pool, Decimal::new(1000, 2), 3).await;
    let orders = OrderRepository::new(&pool);

    let created = orders
        .create_pending(user.id, &[CartItem { product_id: product.id, quantity: 1 }], "1 Main St")
        .await
        .unwrap();

    assert!(orders.mark_paid(created.order_id).await.unwrap());
    // Redelivered webhook changes nothing
    assert!(!orders.mark_paid(created.order_id).await.unwrap());

    let listed = orders.list_for_user(user.id).await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Paid);
}

#[tokio::test]
async fn cancellation_restores_stock() {
    let Some(pool) = live_pool().await else { return };
    let user = create_user(&pool, "cancel").await;
    let product = create_product(&pool, Decimal::new(1500, 2), 5).await;
    let orders = OrderRepository::new(&pool);

    let created = orders
        .create_pending(user.id, &[CartItem { product_id: product.id, quantity: 2 }], "1 Main St")
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product.id).await, 3);

    orders.cancel_and_restock(created.order_id).await.unwrap();
    assert_eq!(stock_of(&pool, product.id).await, 5);

    let listed = orders.list_for_user(user.id).await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Cancelled);

    // Cancelling a terminal order is a no-op
    orders.cancel_and_restock(created.order_id).await.unwrap();
    assert_eq!(stock_of(&pool, product.id).await, 5);
}
