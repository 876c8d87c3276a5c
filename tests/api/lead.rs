use crate::helpers::spawn_app;
use serde_json::json;

fn valid_catering_quote() -> serde_json::Value {
    json!({
        "name": "Marcia Campbell",
        "email": "marcia@example.com",
        "phone": "305-555-0101",
        "eventType": "Wedding",
        "eventDate": "2026-10-10",
        "guestCount": "120",
        "venue": "Key Biscayne",
        "proteins": "Jerk Chicken, Curry Goat",
        "message": "Outdoor reception"
    })
}

fn valid_membership_signup() -> serde_json::Value {
    json!({
        "tier": "premium",
        "firstName": "Andre",
        "lastName": "Walker",
        "email": "andre@example.com",
        "phone": "954-555-0188",
        "address": "88 Sunrise Blvd",
        "city": "Fort Lauderdale",
        "state": "FL",
        "zip": "33304",
        "agreeTerms": true
    })
}

#[actix_web::test]
async fn catering_quote_requires_the_core_fields() {
    let app = spawn_app().await;
    let response = app.post_json("/lead/catering_quote", &json!({})).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Name, email, phone, event type, date, and guest count are required"
    );
}

#[actix_web::test]
async fn catering_quote_rejects_a_bad_email() {
    let app = spawn_app().await;
    let mut quote = valid_catering_quote();
    quote["email"] = json!("marcia-at-example");
    let response = app.post_json("/lead/catering_quote", &quote).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "Please provide a valid email address"
    );
}

#[actix_web::test]
async fn catering_quote_accepts_a_valid_submission() {
    let app = spawn_app().await;
    let response = app
        .post_json("/lead/catering_quote", &valid_catering_quote())
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], true);
    assert_eq!(
        body["customer_message"],
        "Quote request submitted successfully"
    );
    assert_eq!(body["data"]["success"], true);
}

#[actix_web::test]
async fn membership_signup_requires_every_field() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/lead/membership_signup",
            &json!({ "firstName": "Andre", "email": "andre@example.com" }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "All fields are required");
}

#[actix_web::test]
async fn membership_signup_requires_agreeing_to_terms() {
    let app = spawn_app().await;
    let mut signup = valid_membership_signup();
    signup["agreeTerms"] = json!(false);
    let response = app.post_json("/lead/membership_signup", &signup).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(
        body["customer_message"],
        "You must agree to the terms and conditions"
    );
}

#[actix_web::test]
async fn membership_signup_accepts_a_valid_submission() {
    let app = spawn_app().await;
    let response = app
        .post_json("/lead/membership_signup", &valid_membership_signup())
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Signup submitted successfully");
    assert_eq!(body["data"]["success"], true);
}

#[actix_web::test]
async fn subscribe_requires_a_name_and_email() {
    let app = spawn_app().await;
    let response = app.post_json("/lead/subscribe", &json!({})).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Name and email are required");
}

#[actix_web::test]
async fn subscribe_succeeds_without_a_configured_crm() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/lead/subscribe",
            &json!({
                "firstName": "Keisha",
                "email": "keisha@example.com",
                "emailOptIn": true,
                "smsOptIn": false
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Subscriber recorded successfully");
    assert_eq!(body["data"]["success"], true);
}
