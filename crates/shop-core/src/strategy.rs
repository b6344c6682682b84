//! # Payment Strategy Trait
//!
//! Seam between the storefront and hosted payment providers. The storefront
//! persists the order first, then asks the strategy for a hosted checkout
//! session and redirects the customer to the returned URL; the provider
//! reports completion via a signed webhook.

use crate::error::ShopResult;
use crate::order::{CheckoutOrder, CheckoutSession, WebhookEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// A hosted-payment provider implementation.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout session for a persisted order.
    ///
    /// # Arguments
    /// * `order` - The order to collect payment for
    /// * `success_url` - Redirect target after successful payment
    /// * `cancel_url` - Redirect target if the customer backs out
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    ///
    /// Fails closed: any signature or timestamp problem rejects the payload.
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> ShopResult<WebhookEvent>;

    /// Provider name (for logging and session records)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect URLs handed to the provider when opening a session
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the storefront frontend
    pub base_url: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Success page; the provider substitutes the session id placeholder
    pub fn success_url(&self) -> String {
        format!("{}/order-success?session_id={{CHECKOUT_SESSION_ID}}", self.base_url)
    }

    /// Cancel target sends the customer back to their cart
    pub fn cancel_url(&self) -> String {
        format!("{}/checkout", self.base_url)
    }
}
