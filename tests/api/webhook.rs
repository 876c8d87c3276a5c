use crate::helpers::{spawn_app, TestApp};
use serde_json::json;

async fn post_webhook(app: &TestApp, payload: &str, signature: Option<&str>) -> reqwest::Response {
    let mut request = app
        .api_client
        .post(format!("{}/webhook/payment", app.address))
        .body(payload.to_string());
    if let Some(signature) = signature {
        request = request.header("stripe-signature", signature);
    }
    request.send().await.expect("Failed to execute request.")
}

fn succeeded_intent_payload(source: &str) -> String {
    json!({
        "id": "evt_test_1",
        "type": "payment_intent.succeeded",
        "data": {
            "object": {
                "id": "pi_test_123",
                "amount": 1798,
                "currency": "usd",
                "status": "succeeded",
                "customer": "cus_test_123",
                "payment_method": "pm_test_123",
                "metadata": {
                    "source": source,
                    "items": "[{\"id\":\"jerk-sauce-5oz\",\"name\":\"Original Jerk Sauce (5oz)\",\"price\":1199,\"quantity\":1}]",
                    "shipping_option": "standard",
                    "shipping_cost": "599",
                    "customer_name": "Desmond Green",
                    "customer_email": "desmond@example.com",
                    "shipping_address": "14 Palm Way, Miami, FL 33101"
                }
            }
        }
    })
    .to_string()
}

#[actix_web::test]
async fn webhook_rejects_a_missing_signature() {
    let app = spawn_app().await;
    let payload = succeeded_intent_payload("jamaica-house-brand-checkout");
    let response = post_webhook(&app, &payload, None).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], false);
    assert_eq!(body["customer_message"], "No signature provided");
}

#[actix_web::test]
async fn webhook_rejects_an_invalid_signature() {
    let app = spawn_app().await;
    let payload = succeeded_intent_payload("jamaica-house-brand-checkout");
    let forged = format!("t={},v1=deadbeef", chrono::Utc::now().timestamp());
    let response = post_webhook(&app, &payload, Some(&forged)).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Invalid signature");
}

#[actix_web::test]
async fn webhook_acknowledges_unhandled_event_types() {
    let app = spawn_app().await;
    let payload = json!({
        "id": "evt_test_2",
        "type": "customer.created",
        "data": { "object": {} }
    })
    .to_string();
    let signature = app.sign_webhook_payload(payload.as_bytes());
    let response = post_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], true);
    assert_eq!(body["customer_message"], "Webhook processed");
}

#[actix_web::test]
async fn webhook_processes_a_succeeded_payment_intent() {
    let app = spawn_app().await;
    let payload = succeeded_intent_payload("jamaica-house-brand-checkout");
    let signature = app.sign_webhook_payload(payload.as_bytes());
    let response = post_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Webhook processed");
}

#[actix_web::test]
async fn webhook_ignores_intents_from_other_sources() {
    let app = spawn_app().await;
    let payload = succeeded_intent_payload("another-storefront");
    let signature = app.sign_webhook_payload(payload.as_bytes());
    let response = post_webhook(&app, &payload, Some(&signature)).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Webhook processed");
}

#[actix_web::test]
async fn webhook_tolerates_a_malformed_event_object() {
    let app = spawn_app().await;
    let payload = json!({
        "id": "evt_test_3",
        "type": "payment_intent.succeeded",
        "data": { "object": { "unexpected": true } }
    })
    .to_string();
    let signature = app.sign_webhook_payload(payload.as_bytes());
    let response = post_webhook(&app, &payload, Some(&signature)).await;
    // A verified delivery is always acknowledged, whatever its body holds.
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Webhook processed");
}
