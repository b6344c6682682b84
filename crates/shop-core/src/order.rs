//! # Order Types
//!
//! Orders, line items, and the checkout-session handoff types.
//!
//! An order is persisted in `pending` state together with its line items;
//! the total is always derived from catalog prices at creation time, never
//! from the client. `price_at_purchase` is captured per line item so later
//! catalog price changes do not affect historical orders.

use crate::product::{to_cents, Product};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an order. `Pending` until the payment provider confirms;
/// `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal states cannot transition further
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted order line item, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product id
    pub product_id: i32,

    /// Product name at time of purchase (denormalized for display)
    pub product_name: String,

    /// Quantity purchased
    pub quantity: i32,

    /// Unit price captured at order-creation time
    pub price_at_purchase: Decimal,
}

impl OrderItem {
    /// Line total: price-at-purchase times quantity
    pub fn line_total(&self) -> Decimal {
        self.price_at_purchase * Decimal::from(self.quantity)
    }
}

/// A persisted order with its nested line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of line totals. Always equals `total_amount` for a well-formed order.
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// A line in a checkout handed to the payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    /// Display name shown on the hosted payment page
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Unit price in the smallest currency unit (cents)
    pub unit_amount: i64,

    /// Quantity
    pub quantity: i32,
}

impl CheckoutLineItem {
    /// Build a checkout line from a catalog product
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            unit_amount: product.price_cents(),
            quantity,
        }
    }

    /// Line total in cents
    pub fn total_cents(&self) -> i64 {
        self.unit_amount * i64::from(self.quantity)
    }
}

/// Everything the payment provider needs to open a hosted checkout for a
/// persisted order. Carries the order/user correlation ids as metadata so
/// the completion webhook can be reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    /// Persisted order id
    pub order_id: i32,

    /// Owning user id
    pub user_id: i32,

    /// Line items with prices in cents
    pub line_items: Vec<CheckoutLineItem>,

    /// Customer email (optional, for prefill)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Idempotency key (prevents duplicate provider sessions)
    pub idempotency_key: String,
}

impl CheckoutOrder {
    /// Create a checkout payload for an order, generating an idempotency key
    pub fn new(order_id: i32, user_id: i32) -> Self {
        Self {
            order_id,
            user_id,
            line_items: Vec::new(),
            customer_email: None,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    pub fn add_item(&mut self, item: CheckoutLineItem) {
        self.line_items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Order total in cents
    pub fn total_cents(&self) -> i64 {
        self.line_items.iter().map(CheckoutLineItem::total_cents).sum()
    }

    /// Total unit count across all lines
    pub fn item_count(&self) -> i32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }
}

/// Compute an order total from (unit price, quantity) pairs using server-side
/// prices. This is the only total that is ever persisted.
pub fn order_total<'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (&'a Decimal, i32)>,
{
    lines
        .into_iter()
        .map(|(price, qty)| *price * Decimal::from(qty))
        .sum()
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our persisted order ID
    pub order_id: i32,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect the customer to for payment
    pub checkout_url: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Payment intent ID (provider-specific, useful for reconciliation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Hosted checkout session completed
    CheckoutCompleted,
    /// Payment succeeded
    PaymentSucceeded,
    /// Payment failed
    PaymentFailed,
    /// Anything else (passthrough)
    Unknown(String),
}

/// A verified, parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from the provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Related session ID (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Related payment intent ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    /// Amount paid (in cents)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<i64>,

    /// Raw event object (source for metadata extraction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(price_cents: i64) -> CheckoutLineItem {
        CheckoutLineItem {
            name: "Widget".to_string(),
            description: None,
            image_url: None,
            unit_amount: price_cents,
            quantity: 1,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Cancelled] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_total_from_server_prices() {
        // Spec example: 2 units at 19.99 -> 39.98
        let price = Decimal::new(1999, 2);
        let total = order_total([(&price, 2)]);
        assert_eq!(total, Decimal::new(3998, 2));
    }

    #[test]
    fn test_order_total_multiple_lines() {
        let a = Decimal::new(1050, 2); // 10.50
        let b = Decimal::new(299, 2); // 2.99
        let total = order_total([(&a, 2), (&b, 3)]);
        assert_eq!(total, Decimal::new(2997, 2)); // 21.00 + 8.97
    }

    #[test]
    fn test_checkout_order_totals() {
        let mut order = CheckoutOrder::new(1, 42);
        let mut item = widget(1999);
        item.quantity = 2;
        order.add_item(item);
        order.add_item(widget(500));

        assert_eq!(order.total_cents(), 4498);
        assert_eq!(order.item_count(), 3);
        assert!(!order.is_empty());
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: 7,
            product_name: "Widget".to_string(),
            quantity: 2,
            price_at_purchase: Decimal::new(1999, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(3998, 2));
    }

    #[test]
    fn test_computed_total_matches_items() {
        let order = Order {
            id: 1,
            user_id: 42,
            total_amount: Decimal::new(3998, 2),
            status: OrderStatus::Pending,
            shipping_address: "1 Main St".to_string(),
            created_at: Utc::now(),
            items: vec![OrderItem {
                product_id: 7,
                product_name: "Widget".to_string(),
                quantity: 2,
                price_at_purchase: Decimal::new(1999, 2),
            }],
        };
        assert_eq!(order.computed_total(), order.total_amount);
    }
}
