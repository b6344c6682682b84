//! Database access for the storefront PostgreSQL instance.
//!
//! ## Tables
//!
//! - `users` - accounts and password hashes
//! - `products` - the catalog
//! - `orders` / `order_items` - the order ledger
//!
//! Migrations live in `crates/shop-api/migrations/` and are embedded with
//! `sqlx::migrate!`, running at startup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod orders;
pub mod products;
pub mod users;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Create a PostgreSQL connection pool with sensible defaults.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Embedded migrations for the storefront schema
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
