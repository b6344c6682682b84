//! Checkout-session creation against a mocked Stripe API.

use shop_core::{CheckoutLineItem, CheckoutOrder, PaymentStrategy, ShopError};
use shop_stripe::{StripeCheckoutStrategy, StripeConfig};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checkout_order() -> CheckoutOrder {
    let mut order = CheckoutOrder::new(12, 42);
    order.add_item(CheckoutLineItem {
        name: "Widget".to_string(),
        description: Some("A widget".to_string()),
        image_url: Some("https://img.example.com/widget.png".to_string()),
        unit_amount: 1999,
        quantity: 2,
    });
    order
}

fn strategy_for(server: &MockServer) -> StripeCheckoutStrategy {
    let config =
        StripeConfig::new("sk_test_abc", "whsec_test").with_api_base_url(server.uri());
    StripeCheckoutStrategy::new(config).unwrap()
}

#[tokio::test]
async fn creates_checkout_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("Authorization", "Bearer sk_test_abc"))
        .and(body_string_contains("metadata%5Border_id%5D=12"))
        .and(body_string_contains("mode=payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_abc123",
            "url": "https://checkout.stripe.com/c/pay/cs_test_abc123",
            "payment_intent": "pi_123",
            "expires_at": 4102444800i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = strategy_for(&server)
        .create_checkout(
            &checkout_order(),
            "http://localhost:5173/order-success?session_id={CHECKOUT_SESSION_ID}",
            "http://localhost:5173/checkout",
        )
        .await
        .unwrap();

    assert_eq!(session.session_id, "cs_test_abc123");
    assert_eq!(session.order_id, 12);
    assert_eq!(session.provider, "stripe");
    assert!(session.checkout_url.starts_with("https://checkout.stripe.com/"));
    assert_eq!(session.payment_intent_id.as_deref(), Some("pi_123"));
}

#[tokio::test]
async fn surfaces_stripe_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "message": "Invalid currency: usd is not supported here" }
        })))
        .mount(&server)
        .await;

    let err = strategy_for(&server)
        .create_checkout(&checkout_order(), "http://x/s", "http://x/c")
        .await
        .unwrap_err();

    match err {
        ShopError::Provider { provider, message } => {
            assert_eq!(provider, "stripe");
            assert!(message.contains("Invalid currency"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
