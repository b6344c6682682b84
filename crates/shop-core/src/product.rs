//! # Product Types
//!
//! Product catalog types for the ShopHub storefront.
//! Products live in PostgreSQL; this crate only defines the shapes.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Database id
    pub id: i32,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in decimal currency (serialized as a string)
    pub price: Decimal,

    /// Units currently in stock
    pub stock_quantity: i32,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can currently be fulfilled
    pub fn has_stock(&self, quantity: i32) -> bool {
        quantity > 0 && self.stock_quantity >= quantity
    }

    /// Unit price in the smallest currency unit (cents)
    pub fn price_cents(&self) -> i64 {
        to_cents(self.price)
    }
}

/// Convert a decimal currency amount to cents, rounding half away from zero
pub fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::from(100))
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// A cart entry as sent by the client. Transient; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id
    pub product_id: i32,
    /// Desired quantity
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}
