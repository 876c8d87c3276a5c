use crate::helpers::spawn_app;
use serde_json::json;

fn valid_shipping() -> serde_json::Value {
    json!({
        "firstName": "Desmond",
        "lastName": "Green",
        "email": "desmond@example.com",
        "address": "14 Palm Way",
        "city": "Miami",
        "state": "FL",
        "zip": "33101"
    })
}

#[actix_web::test]
async fn create_payment_intent_rejects_an_empty_cart() {
    let app = spawn_app().await;
    let response = app
        .post_json("/order/payment_intent/create", &json!({ "items": [] }))
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], false);
    assert_eq!(body["customer_message"], "Cart is empty");
}

#[actix_web::test]
async fn create_payment_intent_requires_shipping_info() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/order/payment_intent/create",
            &json!({ "items": [{ "id": "jerk-sauce-5oz", "quantity": 1 }] }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Shipping info required");
}

#[actix_web::test]
async fn create_payment_intent_rejects_a_bad_email() {
    let app = spawn_app().await;
    let mut shipping = valid_shipping();
    shipping["email"] = json!("not-an-email");
    let response = app
        .post_json(
            "/order/payment_intent/create",
            &json!({
                "items": [{ "id": "jerk-sauce-5oz", "quantity": 1 }],
                "shipping": shipping
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Please provide a valid email address"
    );
}

#[actix_web::test]
async fn create_payment_intent_rejects_a_bad_zip() {
    let app = spawn_app().await;
    let mut shipping = valid_shipping();
    shipping["zip"] = json!("1234");
    let response = app
        .post_json(
            "/order/payment_intent/create",
            &json!({
                "items": [{ "id": "jerk-sauce-5oz", "quantity": 1 }],
                "shipping": shipping
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Please provide a valid ZIP code");
}

#[actix_web::test]
async fn create_payment_intent_rejects_unknown_products() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/order/payment_intent/create",
            &json!({
                "items": [{ "id": "mystery-hot-sauce", "quantity": 1 }],
                "shipping": valid_shipping()
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Product not found: mystery-hot-sauce"
    );
}

#[actix_web::test]
async fn upsell_charge_rejects_missing_fields() {
    let app = spawn_app().await;
    let response = app.post_json("/order/upsell/charge", &json!({})).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Missing required fields");
}

#[actix_web::test]
async fn upsell_charge_rejects_products_without_an_offer() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/order/upsell/charge",
            &json!({
                "customerId": "cus_test_123",
                "productId": "mystery-hot-sauce",
                "originalPaymentIntentId": "pi_test_123",
                "amount": 599
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Product not found: mystery-hot-sauce"
    );
}

#[actix_web::test]
async fn upsell_offer_matches_cart_contents() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/order/upsell/offer",
            &json!({ "cartItemIds": ["jamaica-house-bundle"] }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["offer"]["productId"], "jerk-sauce-10oz");
    assert_eq!(body["data"]["offer"]["offerPrice"], 1599);
    assert_eq!(body["data"]["downsell"]["productId"], "jerk-sauce-2oz");
    assert_eq!(body["data"]["downsell"]["offerPrice"], 599);
}

#[actix_web::test]
async fn checkout_session_rejects_an_empty_cart() {
    let app = spawn_app().await;
    let response = app
        .post_json("/order/checkout_session/create", &json!({ "items": [] }))
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Cart is empty");
}

#[actix_web::test]
async fn checkout_session_rejects_unknown_products() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/order/checkout_session/create",
            &json!({ "items": [{ "id": "mystery-hot-sauce", "quantity": 1 }] }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Product not found: mystery-hot-sauce"
    );
}
