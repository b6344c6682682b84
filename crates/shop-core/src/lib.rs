//! # shop-core
//!
//! Core types and traits for the ShopHub storefront backend.
//!
//! This crate provides:
//! - `Product` and `CartItem` for the catalog and transient carts
//! - `Order`, `OrderItem`, `OrderStatus`, and `CheckoutSession` for the
//!   order ledger and checkout flow
//! - `User` / `PublicUser` account types
//! - `PaymentStrategy` trait for hosted payment providers
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CheckoutLineItem, CheckoutOrder, PaymentStrategy};
//!
//! // After persisting an order, hand it to the payment provider
//! let mut checkout = CheckoutOrder::new(order.id, user.id);
//! for item in &items {
//!     checkout.add_item(CheckoutLineItem::from_product(&product, item.quantity));
//! }
//! let session = strategy
//!     .create_checkout(&checkout, &urls.success_url(), &urls.cancel_url())
//!     .await?;
//! // Redirect customer to session.checkout_url
//! ```

pub mod error;
pub mod order;
pub mod product;
pub mod strategy;
pub mod user;

// Re-exports for convenience
pub use error::{ShopError, ShopResult};
pub use order::{
    order_total, CheckoutLineItem, CheckoutOrder, CheckoutSession, Order, OrderItem, OrderStatus,
    WebhookEvent, WebhookEventType,
};
pub use product::{to_cents, CartItem, Product};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy};
pub use user::{PublicUser, User};
