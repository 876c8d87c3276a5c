use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpRequest};

use super::errors::WebhookError;
use super::schemas::PaymentWebhookEvent;
use super::utils::{build_order_from_intent, build_order_from_session, dispatch_order_notifications};
use crate::command_center_client::CommandCenterClient;
use crate::configuration::NotificationSettings;
use crate::constants::{CHECKOUT_SOURCE_TAG, METADATA_SOURCE_KEY};
use crate::email_client::GenericEmailService;
use crate::payment_client::{CheckoutSession, PaymentClient, PaymentIntent};
use crate::schemas::{CommunicationType, GenericResponse};
use crate::slack_client::SlackClient;
use utoipa::TupleUnit;

fn acknowledged() -> web::Json<GenericResponse<()>> {
    web::Json(GenericResponse::success("Webhook processed", Some(())))
}

/// Signature failures are the only fatal class here. Everything after
/// verification answers 200 so the processor never retries a delivery we
/// already accepted.
#[utoipa::path(
    post,
    path = "/webhook/payment",
    tag = "Webhook",
    request_body(content = String, description = "Raw event payload, verified against the signature header"),
    responses(
        (status=200, description= "Webhook processed", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    err,
    name = "Process payment webhook",
    skip(req, payload, payment_client, email_pool, slack_client, command_center_client, notification_settings),
    fields()
)]
pub async fn process_payment_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    payment_client: web::Data<PaymentClient>,
    email_pool: web::Data<HashMap<CommunicationType, Arc<dyn GenericEmailService>>>,
    slack_client: web::Data<SlackClient>,
    command_center_client: web::Data<CommandCenterClient>,
    notification_settings: web::Data<NotificationSettings>,
) -> Result<web::Json<GenericResponse<()>>, WebhookError> {
    let signature = match req
        .headers()
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature,
        None => {
            return Err(WebhookError::SignatureError(
                "No signature provided".to_string(),
            ))
        }
    };
    match payment_client.verify_webhook_signature(&payload, signature) {
        Ok(true) => {}
        Ok(false) => {
            return Err(WebhookError::SignatureError("Invalid signature".to_string()));
        }
        Err(err) => {
            tracing::warn!("Webhook signature verification failed: {:?}", err);
            return Err(WebhookError::SignatureError("Invalid signature".to_string()));
        }
    }

    let event: PaymentWebhookEvent = match serde_json::from_slice(&payload) {
        Ok(event) => event,
        Err(err) => {
            tracing::error!("Failed to parse the webhook event: {}", err);
            return Ok(acknowledged());
        }
    };

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session_id = match serde_json::from_value::<CheckoutSession>(event.data.object) {
                Ok(object) => object.id,
                Err(err) => {
                    tracing::error!(
                        "Webhook event {} carries a malformed session object: {}",
                        event.id,
                        err
                    );
                    return Ok(acknowledged());
                }
            };
            // The event payload omits line items, so the session is refetched
            // with them expanded.
            let session = match payment_client.retrieve_checkout_session(&session_id).await {
                Ok(session) => session,
                Err(err) => {
                    tracing::error!(
                        "Failed to refetch checkout session {}: {:?}",
                        session_id,
                        err
                    );
                    return Ok(acknowledged());
                }
            };
            tracing::info!(
                "Order completed: session {}, payment status {:?}, amount {:?}, customer {:?}",
                session.id,
                session.payment_status,
                session.amount_total,
                session
                    .customer_details
                    .as_ref()
                    .and_then(|details| details.email.as_deref())
            );
            let order = build_order_from_session(&session);
            dispatch_order_notifications(
                &order,
                &email_pool,
                &slack_client,
                &command_center_client,
                &notification_settings.order_email_recipient,
            )
            .await;
        }
        "payment_intent.succeeded" => {
            let intent = match serde_json::from_value::<PaymentIntent>(event.data.object) {
                Ok(intent) => intent,
                Err(err) => {
                    tracing::error!(
                        "Webhook event {} carries a malformed intent object: {}",
                        event.id,
                        err
                    );
                    return Ok(acknowledged());
                }
            };
            if intent.metadata.get(METADATA_SOURCE_KEY).map(String::as_str)
                != Some(CHECKOUT_SOURCE_TAG)
            {
                tracing::info!("Ignoring payment intent {} from another source", intent.id);
                return Ok(acknowledged());
            }
            let mut order = build_order_from_intent(&intent);
            if order.customer_email.is_none() {
                if let Some(customer_id) = &intent.customer {
                    match payment_client.retrieve_customer(customer_id).await {
                        Ok(customer) => order.customer_email = customer.email,
                        Err(err) => tracing::warn!(
                            "Failed to fetch customer {} for the receipt email: {:?}",
                            customer_id,
                            err
                        ),
                    }
                }
            }
            tracing::info!(
                "Payment succeeded: intent {}, amount {}, kind {:?}",
                intent.id,
                intent.amount,
                order.kind
            );
            dispatch_order_notifications(
                &order,
                &email_pool,
                &slack_client,
                &command_center_client,
                &notification_settings.order_email_recipient,
            )
            .await;
        }
        other => {
            tracing::info!("Unhandled event type: {}", other);
        }
    }

    Ok(acknowledged())
}
