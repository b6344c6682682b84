//! # Stripe Checkout Sessions
//!
//! Hosted-checkout implementation against Stripe's Checkout Sessions API.
//! Orders are one-time card payments in USD; the persisted order id and the
//! owning user id travel in session metadata so the completion webhook can
//! be reconciled.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use shop_core::{
    CheckoutOrder, CheckoutSession, PaymentStrategy, ShopError, ShopResult, WebhookEvent,
    WebhookEventType,
};
use tracing::{debug, error, info, instrument};

/// Currency for all storefront charges
const CURRENCY: &str = "usd";

/// Webhook timestamps older than this are rejected
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page; card data never touches this server.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Flatten an order into Stripe's form-encoded line_items parameters
    fn line_item_params(order: &CheckoutOrder) -> Vec<(String, String)> {
        let mut params = Vec::new();

        for (i, item) in order.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                CURRENCY.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
            if let Some(ref desc) = item.description {
                params.push((
                    format!("line_items[{i}][price_data][product_data][description]"),
                    desc.clone(),
                ));
            }
            if let Some(ref img) = item.image_url {
                params.push((
                    format!("line_items[{i}][price_data][product_data][images][0]"),
                    img.clone(),
                ));
            }
            params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        params
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, order), fields(order_id = order.order_id))]
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if order.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        debug!(
            "Creating Stripe checkout session: {} items, {} cents",
            order.line_items.len(),
            order.total_cents()
        );

        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        form_params.extend(Self::line_item_params(order));

        if let Some(ref email) = order.customer_email {
            form_params.push(("customer_email".to_string(), email.clone()));
        }

        // Correlation metadata for webhook reconciliation
        form_params.push(("metadata[order_id]".to_string(), order.order_id.to_string()));
        form_params.push(("metadata[user_id]".to_string(), order.user_id.to_string()));

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &order.idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShopError::Provider {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShopError::Provider {
                provider: "stripe".to_string(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| ShopError::Serialization(format!("failed to parse Stripe response: {e}")))?;

        info!(
            "Created Stripe checkout session: id={}, order_id={}",
            session.id, order.order_id
        );

        let expires_at = session
            .expires_at
            .map(|ts| DateTime::from_timestamp(ts, 0).unwrap_or(Utc::now() + Duration::hours(24)));

        Ok(CheckoutSession {
            session_id: session.id,
            order_id: order.order_id,
            provider: "stripe".to_string(),
            checkout_url: session.url,
            expires_at,
            payment_intent_id: session.payment_intent,
            created_at: Utc::now(),
        })
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(&self, payload: &[u8], signature: &str) -> ShopResult<WebhookEvent> {
        let sig_parts = parse_signature_header(signature)?;

        let now = Utc::now().timestamp();
        if (now - sig_parts.timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
            return Err(ShopError::WebhookVerification(
                "timestamp outside tolerance".to_string(),
            ));
        }

        let signed_payload = format!("{}.{}", sig_parts.timestamp, String::from_utf8_lossy(payload));
        let expected_sig = compute_hmac_sha256(&self.config.webhook_secret, &signed_payload);

        let valid = sig_parts
            .signatures
            .iter()
            .any(|sig| constant_time_compare(sig, &expected_sig));

        if !valid {
            return Err(ShopError::WebhookVerification("signature mismatch".to_string()));
        }

        let event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| ShopError::WebhookParse(format!("failed to parse webhook: {e}")))?;

        debug!("Verified Stripe webhook: type={}", event.event_type);

        let event_type = match event.event_type.as_str() {
            "checkout.session.completed" => WebhookEventType::CheckoutCompleted,
            "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        };

        let session_id = event
            .data
            .object
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from);

        let payment_intent_id = event
            .data
            .object
            .get("payment_intent")
            .and_then(|v| v.as_str())
            .map(String::from);

        let amount_paid = event.data.object.get("amount_total").and_then(|v| v.as_i64());

        Ok(WebhookEvent {
            event_id: event.id,
            event_type,
            provider: "stripe".to_string(),
            session_id,
            payment_intent_id,
            amount_paid,
            raw_data: Some(serde_json::Value::Object(event.data.object)),
            timestamp: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: String,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeApiError,
}

#[derive(Debug, Deserialize)]
struct StripeApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Webhook Signature Verification
// =============================================================================

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> ShopResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        ShopError::WebhookVerification("missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(ShopError::WebhookVerification("no v1 signature found".to_string()));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

pub(crate) fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}
