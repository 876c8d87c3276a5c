use crate::helpers::spawn_app;
use serde_json::json;

#[actix_web::test]
async fn chat_requires_a_message() {
    let app = spawn_app().await;
    let response = app.post_json("/chat/message", &json!({})).await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["customer_message"], "Message is required");
}

#[actix_web::test]
async fn chat_answers_shipping_questions_from_the_script() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/chat/message",
            &json!({ "message": "How much is shipping?", "history": [] }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    assert_eq!(body["status"], true);
    let reply = body["data"]["reply"].as_str().unwrap_or_default();
    assert!(reply.contains("$5.99"));
}

#[actix_web::test]
async fn chat_falls_back_to_whatsapp_for_unknown_topics() {
    let app = spawn_app().await;
    let response = app
        .post_json(
            "/chat/message",
            &json!({
                "message": "Tell me about quantum computing",
                "history": [{ "role": "user", "content": "hi" }]
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    let reply = body["data"]["reply"].as_str().unwrap_or_default();
    assert!(reply.contains("+1 (786) 709-1027"));
}
