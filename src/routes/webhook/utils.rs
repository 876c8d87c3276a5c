use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::command_center_client::CommandCenterClient;
use crate::constants::{
    METADATA_CUSTOMER_EMAIL_KEY, METADATA_CUSTOMER_NAME_KEY, METADATA_ITEMS_KEY,
    METADATA_SHIPPING_ADDRESS_KEY, METADATA_SHIPPING_COST_KEY, METADATA_TYPE_KEY,
    UPSELL_CHARGE_TYPE,
};
use crate::email_client::GenericEmailService;
use crate::payment_client::{CheckoutSession, PaymentIntent, SessionAddress};
use crate::schemas::{
    CommunicationType, MetadataOrderItem, OrderKind, OrderLineSummary, OrderNotificationData,
};
use crate::slack_client::SlackClient;
use crate::utils::format_usd;

/// Rebuilds the order summary from intent metadata. Metadata is treated as
/// untrusted input, so malformed pieces degrade to empty fields instead of
/// failing the delivery.
pub fn build_order_from_intent(intent: &PaymentIntent) -> OrderNotificationData {
    let kind = if intent.metadata.get(METADATA_TYPE_KEY).map(String::as_str)
        == Some(UPSELL_CHARGE_TYPE)
    {
        OrderKind::Upsell
    } else {
        OrderKind::Primary
    };
    let line_items: Vec<OrderLineSummary> = match intent.metadata.get(METADATA_ITEMS_KEY) {
        Some(raw) => match serde_json::from_str::<Vec<MetadataOrderItem>>(raw) {
            Ok(items) => items.into_iter().map(OrderLineSummary::from).collect(),
            Err(err) => {
                tracing::warn!(
                    "Intent {} carries malformed items metadata: {}",
                    intent.id,
                    err
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let metadata_field = |key: &str| {
        intent
            .metadata
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    };
    OrderNotificationData {
        order_id: intent.id.clone(),
        kind,
        customer_email: metadata_field(METADATA_CUSTOMER_EMAIL_KEY),
        customer_name: metadata_field(METADATA_CUSTOMER_NAME_KEY),
        shipping_address: metadata_field(METADATA_SHIPPING_ADDRESS_KEY),
        shipping_cost: intent
            .metadata
            .get(METADATA_SHIPPING_COST_KEY)
            .and_then(|raw| raw.parse::<i64>().ok()),
        line_items,
        total: intent.amount,
        placed_at: Utc::now(),
    }
}

pub fn build_order_from_session(session: &CheckoutSession) -> OrderNotificationData {
    let shipping_details = session
        .collected_information
        .as_ref()
        .and_then(|info| info.shipping_details.as_ref());
    let customer_name = shipping_details
        .and_then(|details| details.name.clone())
        .or_else(|| {
            session
                .customer_details
                .as_ref()
                .and_then(|details| details.name.clone())
        });
    let line_items: Vec<OrderLineSummary> = session
        .line_items
        .as_ref()
        .map(|items| {
            items
                .data
                .iter()
                .map(|item| {
                    let quantity = item.quantity.unwrap_or(1).max(1);
                    OrderLineSummary {
                        name: item
                            .description
                            .clone()
                            .unwrap_or_else(|| "Unknown item".to_string()),
                        quantity,
                        unit_price: item.amount_total.unwrap_or(0) / quantity,
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    OrderNotificationData {
        order_id: session.id.clone(),
        kind: OrderKind::Primary,
        customer_email: session
            .customer_details
            .as_ref()
            .and_then(|details| details.email.clone()),
        customer_name,
        shipping_address: shipping_details
            .and_then(|details| details.address.as_ref())
            .map(format_session_address),
        shipping_cost: session.shipping_cost.as_ref().map(|cost| cost.amount_total),
        line_items,
        total: session.amount_total.unwrap_or(0),
        placed_at: Utc::now(),
    }
}

pub fn format_session_address(address: &SessionAddress) -> String {
    let mut street = address.line1.clone().unwrap_or_default();
    if let Some(line2) = &address.line2 {
        if !line2.is_empty() {
            street.push_str(", ");
            street.push_str(line2);
        }
    }
    format!(
        "{}, {}, {} {}",
        street,
        address.city.as_deref().unwrap_or(""),
        address.state.as_deref().unwrap_or(""),
        address.postal_code.as_deref().unwrap_or("")
    )
}

pub fn generate_receipt_subject(order: &OrderNotificationData) -> String {
    let label = if order.is_upsell() {
        "New Upsell Order"
    } else {
        "New Order"
    };
    format!(
        "{} - {} - {}",
        label,
        order.customer_name.as_deref().unwrap_or("Unknown Customer"),
        format_usd(order.total)
    )
}

pub fn generate_receipt_html(order: &OrderNotificationData) -> String {
    let heading = if order.is_upsell() {
        "New Upsell Order"
    } else {
        "New Order Received"
    };
    let items = if order.line_items.is_empty() {
        "<p>Items not available</p>".to_string()
    } else {
        order
            .line_items
            .iter()
            .map(|line| {
                format!(
                    "<p>{}x {} - {}</p>",
                    line.quantity,
                    line.name,
                    format_usd(line.unit_price * line.quantity)
                )
            })
            .collect::<Vec<_>>()
            .join("\n    ")
    };
    let shipping_section = match &order.shipping_address {
        Some(address) => format!(
            "<h2 style=\"font-size: 18px; border-bottom: 2px solid #d4a437; padding-bottom: 8px;\">Shipping Address</h2>\n    <p>{}</p>\n    ",
            address
        ),
        None => String::new(),
    };
    let shipping_line = match order.shipping_cost {
        Some(0) => "<p><strong>Shipping:</strong> Free</p>\n    ".to_string(),
        Some(cost) => format!("<p><strong>Shipping:</strong> {}</p>\n    ", format_usd(cost)),
        None => String::new(),
    };
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; color: #333;">
  <div style="background: #1a1a2e; padding: 24px; text-align: center;">
    <h1 style="color: #d4a437; margin: 0; font-size: 24px;">{heading}</h1>
  </div>
  <div style="padding: 24px; background: #fff;">
    <h2 style="font-size: 18px; border-bottom: 2px solid #d4a437; padding-bottom: 8px;">Customer Details</h2>
    <p><strong>Name:</strong> {name}<br><strong>Email:</strong> {email}</p>
    {shipping_section}<h2 style="font-size: 18px; border-bottom: 2px solid #d4a437; padding-bottom: 8px;">Items Ordered</h2>
    {items}
    {shipping_line}<p style="font-size: 18px;"><strong>Total: {total}</strong></p>
  </div>
  <div style="background: #1a1a2e; padding: 16px; text-align: center;">
    <p style="color: #888; font-size: 12px; margin: 0;">Jamaica House Brand - Order Notification</p>
  </div>
</div>"#,
        heading = heading,
        name = order.customer_name.as_deref().unwrap_or("N/A"),
        email = order.customer_email.as_deref().unwrap_or("No email"),
        shipping_section = shipping_section,
        items = items,
        shipping_line = shipping_line,
        total = format_usd(order.total),
    )
}

pub async fn send_receipt_email(
    order: &OrderNotificationData,
    email_pool: &HashMap<CommunicationType, Arc<dyn GenericEmailService>>,
    recipient: &str,
) -> Result<(), anyhow::Error> {
    let email_service = email_pool
        .get(&CommunicationType::OrderReceipt)
        .ok_or_else(|| anyhow::anyhow!("No transport registered for order receipt emails"))?;
    let subject = generate_receipt_subject(order);
    let body = generate_receipt_html(order);
    email_service
        .send_html_email(recipient, &subject, body)
        .await
        .map_err(|err| anyhow::anyhow!("Failed to send the order receipt email: {}", err))?;
    Ok(())
}

pub fn failed_channels<E>(outcomes: &[(&'static str, Result<(), E>)]) -> Vec<&'static str> {
    outcomes
        .iter()
        .filter(|(_, result)| result.is_err())
        .map(|(channel, _)| *channel)
        .collect()
}

/// Fans one order out to email, Slack and the command center. The three sends
/// run concurrently and are joined; a failed channel is logged and never
/// aborts its siblings or the webhook response.
#[tracing::instrument(
    name = "Dispatch order notifications",
    skip_all,
    fields(order_id = %order.order_id)
)]
pub async fn dispatch_order_notifications(
    order: &OrderNotificationData,
    email_pool: &HashMap<CommunicationType, Arc<dyn GenericEmailService>>,
    slack_client: &SlackClient,
    command_center_client: &CommandCenterClient,
    order_email_recipient: &str,
) {
    let (email_result, slack_result, command_center_result) = futures::future::join3(
        send_receipt_email(order, email_pool, order_email_recipient),
        slack_client.send_order_notification(order),
        command_center_client.send_order(order),
    )
    .await;
    let outcomes = [
        ("email", email_result),
        ("slack", slack_result),
        ("command center", command_center_result),
    ];
    for (channel, result) in &outcomes {
        match result {
            Ok(()) => tracing::info!(
                "Sent the {} notification for order {}",
                channel,
                order.order_id
            ),
            Err(err) => tracing::error!(
                "Failed to send the {} notification for order {}: {:?}",
                channel,
                order.order_id,
                err
            ),
        }
    }
    let failed = failed_channels(&outcomes);
    if !failed.is_empty() {
        tracing::warn!(
            "Order {} was dispatched with failed channels: {}",
            order.order_id,
            failed.join(", ")
        );
    }
}
