//! # shop-stripe
//!
//! Stripe payment strategy for the ShopHub storefront.
//!
//! Implements `shop_core::PaymentStrategy` against Stripe's hosted Checkout
//! Sessions API. Card data never touches the storefront; it only redirects
//! the customer to `checkout_url` and later receives a signed webhook when
//! payment completes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeCheckoutStrategy;
//! use shop_core::PaymentStrategy;
//!
//! let strategy = StripeCheckoutStrategy::from_env()?;
//! let session = strategy
//!     .create_checkout(&checkout_order, &success_url, &cancel_url)
//!     .await?;
//! // Redirect customer to session.checkout_url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! let event = strategy.verify_webhook(&body, signature).await?;
//! if let WebhookEventType::CheckoutCompleted = event.event_type {
//!     let data = CheckoutCompletedData::from_event(&event)?;
//!     if data.is_paid() {
//!         // Mark data.order_id() as paid
//!     }
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod webhook;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
pub use webhook::{CheckoutCompletedData, REQUIRED_WEBHOOK_EVENTS};
