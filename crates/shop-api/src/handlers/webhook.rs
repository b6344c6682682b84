//! Payment-provider webhook handler.
//!
//! This is the authoritative path for marking orders paid. The browser
//! redirect to the success page is cosmetic and cannot be trusted; only a
//! signature-verified `checkout.session.completed` event flips an order
//! from `pending` to `paid`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use shop_core::{ShopError, WebhookEventType};
use shop_stripe::CheckoutCompletedData;
use tracing::{info, instrument, warn};

use crate::db::OrderRepository;
use crate::error::ApiResult;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Receive and verify a Stripe webhook event
#[instrument(skip_all)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ShopError::WebhookVerification("missing Stripe-Signature header".to_string())
        })?;

    let event = state.payment.verify_webhook(&body, signature).await?;

    match event.event_type {
        WebhookEventType::CheckoutCompleted => {
            let completed = CheckoutCompletedData::from_event(&event)?;
            if !completed.is_paid() {
                info!(
                    session_id = %completed.session_id,
                    payment_status = %completed.payment_status,
                    "checkout completed but not paid, leaving order pending"
                );
                return Ok(StatusCode::OK);
            }

            let Some(order_id) = completed.order_id() else {
                warn!(
                    session_id = %completed.session_id,
                    "checkout completed without an order_id in metadata"
                );
                return Ok(StatusCode::OK);
            };

            let updated = OrderRepository::new(&state.pool).mark_paid(order_id).await?;
            if updated {
                info!(order_id, session_id = %completed.session_id, "order marked paid");
            } else {
                // Redelivery or an already-cancelled order; acknowledge anyway
                info!(order_id, "order not pending, webhook treated as no-op");
            }
        }
        WebhookEventType::PaymentFailed => {
            warn!(event_id = %event.event_id, "payment failed event received");
        }
        other => {
            info!(event_id = %event.event_id, event_type = ?other, "unhandled webhook event");
        }
    }

    Ok(StatusCode::OK)
}
