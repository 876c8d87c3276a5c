use bigdecimal::BigDecimal;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::configuration::NotificationSettings;
use crate::schemas::OrderNotificationData;
use crate::utils::cents_to_dollars;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCenterOrderItem {
    pub name: String,
    pub qty: i64,
    pub price: BigDecimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCenterOrderRequest {
    pub order_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub items: Vec<CommandCenterOrderItem>,
    pub shipping_cost: BigDecimal,
    pub total: BigDecimal,
}

/// Mirrors every paid order into the internal operations dashboard.
#[derive(Debug)]
pub struct CommandCenterClient {
    http_client: Client,
    base_url: String,
    authorization_token: SecretString,
}

impl CommandCenterClient {
    #[tracing::instrument]
    pub fn new(notification_config: &NotificationSettings) -> Self {
        let http_client = Client::builder()
            .timeout(notification_config.timeout())
            .build()
            .unwrap();
        Self {
            http_client,
            base_url: notification_config.command_center_base_url.clone(),
            authorization_token: notification_config.command_center_api_key.clone(),
        }
    }

    fn get_auth_token(&self) -> String {
        format!("Bearer {}", self.authorization_token.expose_secret())
    }

    fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.authorization_token.expose_secret().is_empty()
    }

    /// The dashboard keys customers on split first/last names, so the
    /// single display name is divided at the first space.
    pub fn generate_order_request(order: &OrderNotificationData) -> CommandCenterOrderRequest {
        let full_name = order.customer_name.clone().unwrap_or_default();
        let (first_name, last_name) = match full_name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (full_name, String::new()),
        };
        CommandCenterOrderRequest {
            order_id: order.order_id.clone(),
            first_name,
            last_name,
            email: order.customer_email.clone().unwrap_or_default(),
            items: order
                .line_items
                .iter()
                .map(|line| CommandCenterOrderItem {
                    name: line.name.clone(),
                    qty: line.quantity,
                    price: cents_to_dollars(line.unit_price),
                })
                .collect(),
            shipping_cost: cents_to_dollars(order.shipping_cost.unwrap_or(0)),
            total: cents_to_dollars(order.total),
        }
    }

    pub async fn send_order(&self, order: &OrderNotificationData) -> Result<(), anyhow::Error> {
        if !self.is_configured() {
            tracing::info!("Command center credentials are not set, skipping the order push");
            return Ok(());
        }
        let url = format!("{}/orders", self.base_url);
        let request_body = Self::generate_order_request(order);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!(
                "Command center returned {}: {}",
                status,
                body
            ))
        }
    }
}
