//! # Stripe Webhook Data
//!
//! Extraction helpers for verified webhook events. The completion payload
//! carries our order id in session metadata; that is the only link between
//! a Stripe session and the pending order it pays for.

use shop_core::{ShopError, ShopResult, WebhookEvent};

/// Parsed `checkout.session.completed` event data
#[derive(Debug, Clone)]
pub struct CheckoutCompletedData {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_email: Option<String>,
    pub amount_total: i64,
    pub payment_status: String,
    pub metadata: std::collections::HashMap<String, String>,
}

impl CheckoutCompletedData {
    /// Parse from a verified webhook event
    pub fn from_event(event: &WebhookEvent) -> ShopResult<Self> {
        let raw = event
            .raw_data
            .as_ref()
            .ok_or_else(|| ShopError::WebhookParse("missing raw data".to_string()))?;

        let obj = raw
            .as_object()
            .ok_or_else(|| ShopError::WebhookParse("raw data is not an object".to_string()))?;

        let session_id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| ShopError::WebhookParse("missing session id".to_string()))?;

        let payment_intent_id = obj
            .get("payment_intent")
            .and_then(|v| v.as_str())
            .map(String::from);

        let customer_email = obj
            .get("customer_details")
            .and_then(|cd| cd.get("email"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let amount_total = obj.get("amount_total").and_then(|v| v.as_i64()).unwrap_or(0);

        let payment_status = obj
            .get("payment_status")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        let metadata = obj
            .get("metadata")
            .and_then(|m| m.as_object())
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            session_id,
            payment_intent_id,
            customer_email,
            amount_total,
            payment_status,
            metadata,
        })
    }

    /// Check if payment was collected
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    /// The storefront order id from session metadata
    pub fn order_id(&self) -> Option<i32> {
        self.metadata.get("order_id").and_then(|s| s.parse().ok())
    }

    /// The owning user id from session metadata
    pub fn user_id(&self) -> Option<i32> {
        self.metadata.get("user_id").and_then(|s| s.parse().ok())
    }
}

/// Events that should be enabled on the Stripe webhook endpoint
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &[
    "checkout.session.completed",
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
];
