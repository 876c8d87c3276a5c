use serde::Deserialize;

/// Envelope the processor wraps around every event. The inner object is kept
/// as raw JSON until the event type says what it is.
#[derive(Deserialize, Debug)]
pub struct PaymentWebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentWebhookEventData,
}

#[derive(Deserialize, Debug)]
pub struct PaymentWebhookEventData {
    pub object: serde_json::Value,
}
