//! Checkout and order-history handlers.
//!
//! Checkout persists a pending order (validated against live stock inside a
//! transaction), then opens a hosted payment session carrying the order id
//! as correlation metadata. If the payment provider call fails after the
//! order was persisted, the order is cancelled and its stock restored so no
//! unpayable pending order survives.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use shop_core::{CartItem, CheckoutLineItem, CheckoutOrder, Order};
use tracing::{error, instrument};

use crate::db::OrderRepository;
use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::state::AppState;

/// Checkout request
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub shipping_address: String,
}

/// Checkout response: the persisted order and the hosted-payment redirect
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "orderId")]
    pub order_id: i32,
    pub url: String,
}

/// Create a pending order and a hosted checkout session for it
#[instrument(skip(state, user, request), fields(user_id = user.0.sub, items = request.items.len()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateCheckoutRequest>,
) -> ApiResult<Json<CreateCheckoutResponse>> {
    let orders = OrderRepository::new(&state.pool);

    let created = orders
        .create_pending(user.0.sub, &request.items, &request.shipping_address)
        .await?;

    let mut checkout = CheckoutOrder::new(created.order_id, user.0.sub)
        .with_email(user.0.email.clone());
    for (product, quantity) in &created.lines {
        checkout.add_item(CheckoutLineItem::from_product(product, *quantity));
    }

    let session = match state
        .payment
        .create_checkout(&checkout, &state.urls.success_url(), &state.urls.cancel_url())
        .await
    {
        Ok(session) => session,
        Err(err) => {
            // Compensate: the order exists but can never be paid
            error!(order_id = created.order_id, "payment session creation failed: {err}");
            if let Err(cancel_err) = orders.cancel_and_restock(created.order_id).await {
                error!(
                    order_id = created.order_id,
                    "compensating cancellation failed: {cancel_err}"
                );
            }
            return Err(err.into());
        }
    };

    Ok(Json(CreateCheckoutResponse {
        session_id: session.session_id,
        order_id: created.order_id,
        url: session.checkout_url,
    }))
}

/// The caller's own orders, newest first, with nested line items
#[instrument(skip(state, user), fields(user_id = user.0.sub))]
pub async fn my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = OrderRepository::new(&state.pool)
        .list_for_user(user.0.sub)
        .await?;

    Ok(Json(orders))
}
