use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::configuration::NotificationSettings;
use crate::schemas::OrderNotificationData;
use crate::utils::format_usd;

/// Posts order alerts to an incoming-webhook channel. The webhook URL
/// embeds its own credential, so it is held as a secret.
#[derive(Debug)]
pub struct SlackClient {
    http_client: Client,
    webhook_url: SecretString,
}

impl SlackClient {
    #[tracing::instrument]
    pub fn new(notification_config: &NotificationSettings) -> Self {
        let http_client = Client::builder()
            .timeout(notification_config.timeout())
            .build()
            .unwrap();
        Self {
            http_client,
            webhook_url: notification_config.slack_webhook_url.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.webhook_url.expose_secret().is_empty()
    }

    pub fn generate_order_blocks(&self, order: &OrderNotificationData) -> Value {
        let header = if order.is_upsell() {
            "🛒 New Upsell Order!"
        } else {
            "🛒 New Order Received!"
        };
        let total = format_usd(order.total);
        let email = order.customer_email.as_deref().unwrap_or("No email");
        let name = order.customer_name.as_deref().unwrap_or("N/A");
        let address_line = order.shipping_address.as_deref().unwrap_or("No address");
        let shipping = match order.shipping_cost {
            Some(0) => "Free Shipping".to_string(),
            Some(amount) => format_usd(amount),
            None => "N/A".to_string(),
        };
        let items = if order.line_items.is_empty() {
            "Items not available".to_string()
        } else {
            order
                .line_items
                .iter()
                .map(|line| format!("• {}x {}", line.quantity, line.name))
                .collect::<Vec<String>>()
                .join("\n")
        };
        json!({
            "blocks": [
                {
                    "type": "header",
                    "text": { "type": "plain_text", "text": header },
                },
                {
                    "type": "section",
                    "fields": [
                        { "type": "mrkdwn", "text": format!("*Total:*\n{}", total) },
                        { "type": "mrkdwn", "text": format!("*Shipping:*\n{}", shipping) },
                        { "type": "mrkdwn", "text": format!("*Customer:*\n{}", email) },
                        { "type": "mrkdwn", "text": format!("*Ship To:*\n{}", name) },
                    ],
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": format!("*Address:*\n{}", address_line) },
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": format!("*Items:*\n{}", items) },
                },
            ],
        })
    }

    pub async fn send_order_notification(
        &self,
        order: &OrderNotificationData,
    ) -> Result<(), anyhow::Error> {
        if !self.is_configured() {
            tracing::info!("Slack webhook URL is not set, skipping the Slack notification");
            return Ok(());
        }
        let request_body = self.generate_order_blocks(order);
        let response = self
            .http_client
            .post(self.webhook_url.expose_secret())
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("Slack webhook returned {}: {}", status, body))
        }
    }
}
