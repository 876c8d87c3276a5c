use actix_web::http::header;
use actix_web::{web, HttpRequest};
use anyhow::Context;

use super::errors::OrderError;
use super::schemas::{
    CheckoutSessionResponse, CheckoutSessionWebRequest, PaymentIntentCreateResponse,
    PaymentIntentCreateWebRequest, RequestItem, UpsellChargeResponse, UpsellChargeWebRequest,
    UpsellOfferResponse, UpsellOfferWebRequest,
};
use super::utils::{
    build_intent_metadata, build_session_line_items, validate_cart, validate_shipping,
};
use crate::catalog::{
    downsell_offer, offer_for, select_upsell_offer, shipping_cost, ShippingOptionType,
};
use crate::configuration::ApplicationSettings;
use crate::constants::{
    CHECKOUT_SOURCE_TAG, FREE_SHIPPING_THRESHOLD, METADATA_ITEMS_KEY,
    METADATA_ORIGINAL_INTENT_KEY, METADATA_SOURCE_KEY, METADATA_TYPE_KEY, UPSELL_CHARGE_TYPE,
    WEB_SOURCE_TAG,
};
use crate::payment_client::{CheckoutSessionCreateRequest, PaymentClient};
use crate::schemas::{GenericResponse, MetadataOrderItem};
use crate::utils::format_usd;

#[utoipa::path(
    post,
    path = "/order/payment_intent/create",
    tag = "Order",
    request_body(content = PaymentIntentCreateWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment intent created", body= GenericResponse<PaymentIntentCreateResponse>),
    )
)]
#[tracing::instrument(err, name = "Create payment intent", skip(payment_client, body), fields())]
pub async fn create_payment_intent(
    body: PaymentIntentCreateWebRequest,
    payment_client: web::Data<PaymentClient>,
) -> Result<web::Json<GenericResponse<PaymentIntentCreateResponse>>, OrderError> {
    if body.items.is_empty() {
        return Err(OrderError::ValidationError("Cart is empty".to_string()));
    }
    let shipping = validate_shipping(body.shipping.as_ref())?;
    let (lines, subtotal) = validate_cart(&body.items)?;
    let shipping_option = body.shipping_option.unwrap_or(ShippingOptionType::Standard);
    let shipping_cost_cents = shipping_cost(shipping_option, subtotal);
    let total = subtotal + shipping_cost_cents;
    if total <= 0 {
        return Err(OrderError::ValidationError(
            "Order total must be greater than zero".to_string(),
        ));
    }
    let customer = payment_client.create_customer(shipping).await.map_err(|e| {
        OrderError::PaymentGatewayError("Failed to create payment intent".to_string(), e)
    })?;
    let metadata = build_intent_metadata(&lines, shipping_option, shipping_cost_cents, shipping)?;
    let request =
        payment_client.generate_intent_create_request(total, Some(customer.id.clone()), metadata);
    let intent = payment_client
        .create_payment_intent(request)
        .await
        .map_err(|e| {
            OrderError::PaymentGatewayError("Failed to create payment intent".to_string(), e)
        })?;
    tracing::info!(
        "Created payment intent {} for {}",
        intent.id,
        format_usd(total)
    );
    Ok(web::Json(GenericResponse::success(
        "Payment intent created successfully",
        Some(PaymentIntentCreateResponse {
            client_secret: intent.client_secret,
            customer_id: customer.id,
            payment_intent_id: intent.id,
        }),
    )))
}

#[utoipa::path(
    post,
    path = "/order/upsell/charge",
    tag = "Order",
    request_body(content = UpsellChargeWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Offer charged", body= GenericResponse<UpsellChargeResponse>),
    )
)]
#[tracing::instrument(
    err,
    name = "Charge post purchase offer",
    skip(payment_client, body),
    fields(product_id = %body.product_id)
)]
pub async fn charge_upsell(
    body: UpsellChargeWebRequest,
    payment_client: web::Data<PaymentClient>,
) -> Result<web::Json<GenericResponse<UpsellChargeResponse>>, OrderError> {
    if body.customer_id.is_empty()
        || body.amount == 0
        || body.original_payment_intent_id.is_empty()
    {
        return Err(OrderError::ValidationError(
            "Missing required fields".to_string(),
        ));
    }
    let offer = offer_for(&body.product_id).ok_or_else(|| {
        OrderError::ValidationError(format!("Product not found: {}", body.product_id))
    })?;
    if body.amount != offer.offer_price {
        tracing::warn!(
            "Client sent amount {} for {} but the offer price is {}; charging the offer price",
            body.amount,
            offer.product_id,
            offer.offer_price
        );
    }
    let original_intent = payment_client
        .retrieve_payment_intent(&body.original_payment_intent_id)
        .await
        .map_err(|e| OrderError::PaymentGatewayError("Upsell payment failed".to_string(), e))?;
    let payment_method = match original_intent.payment_method {
        Some(payment_method) => payment_method,
        None => {
            return Err(OrderError::ValidationError(
                "No payment method found on original payment".to_string(),
            ))
        }
    };
    let display_name = body.product_name.as_deref().unwrap_or(offer.name);
    let display_size = body.product_size.as_deref().unwrap_or(offer.size);
    let items = vec![MetadataOrderItem {
        id: offer.product_id.to_string(),
        name: format!("{} ({})", display_name, display_size),
        price: offer.offer_price,
        quantity: 1,
    }];
    let items_json = serde_json::to_string(&items)
        .context("Failed to serialize the offer item for intent metadata")?;
    let metadata = vec![
        (
            METADATA_SOURCE_KEY.to_string(),
            CHECKOUT_SOURCE_TAG.to_string(),
        ),
        (METADATA_TYPE_KEY.to_string(), UPSELL_CHARGE_TYPE.to_string()),
        (
            METADATA_ORIGINAL_INTENT_KEY.to_string(),
            body.original_payment_intent_id.clone(),
        ),
        (METADATA_ITEMS_KEY.to_string(), items_json),
    ];
    let request = payment_client.generate_off_session_charge_request(
        offer.offer_price,
        body.customer_id.clone(),
        payment_method,
        metadata,
    );
    let intent = payment_client
        .create_payment_intent(request)
        .await
        .map_err(|e| OrderError::PaymentGatewayError("Upsell payment failed".to_string(), e))?;
    tracing::info!(
        "Charged offer {} as intent {} against {}",
        offer.product_id,
        intent.id,
        body.original_payment_intent_id
    );
    Ok(web::Json(GenericResponse::success(
        "Offer charged successfully",
        Some(UpsellChargeResponse {
            payment_intent_id: intent.id,
        }),
    )))
}

#[utoipa::path(
    post,
    path = "/order/upsell/offer",
    tag = "Order",
    request_body(content = UpsellOfferWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Offer selected", body= GenericResponse<UpsellOfferResponse>),
    )
)]
#[tracing::instrument(name = "Fetch post purchase offer", skip(body), fields())]
pub async fn fetch_upsell_offer(
    body: UpsellOfferWebRequest,
) -> Result<web::Json<GenericResponse<UpsellOfferResponse>>, OrderError> {
    let cart_item_ids: Vec<&str> = body.cart_item_ids.iter().map(String::as_str).collect();
    let offer = select_upsell_offer(&cart_item_ids);
    Ok(web::Json(GenericResponse::success(
        "Offer selected successfully",
        Some(UpsellOfferResponse {
            offer: offer.clone(),
            downsell: downsell_offer().clone(),
        }),
    )))
}

#[utoipa::path(
    post,
    path = "/order/checkout_session/create",
    tag = "Order",
    request_body(content = CheckoutSessionWebRequest, description = "Request Body"),
    responses(
        (status=200, description= "Checkout session created", body= GenericResponse<CheckoutSessionResponse>),
    )
)]
#[tracing::instrument(
    err,
    name = "Create checkout session",
    skip(req, payment_client, application_settings, body),
    fields()
)]
pub async fn create_checkout_session(
    req: HttpRequest,
    body: CheckoutSessionWebRequest,
    payment_client: web::Data<PaymentClient>,
    application_settings: web::Data<ApplicationSettings>,
) -> Result<web::Json<GenericResponse<CheckoutSessionResponse>>, OrderError> {
    if body.items.is_empty() {
        return Err(OrderError::ValidationError("Cart is empty".to_string()));
    }
    let request_items: Vec<RequestItem> = body
        .items
        .iter()
        .map(|item| RequestItem {
            id: item.id.clone(),
            quantity: item.quantity,
        })
        .collect();
    let (lines, subtotal) = validate_cart(&request_items)?;
    let line_items = build_session_line_items(&body.items, &lines);
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(&application_settings.storefront_origin)
        .to_string();
    let request = CheckoutSessionCreateRequest {
        line_items,
        include_free_shipping: subtotal >= FREE_SHIPPING_THRESHOLD,
        success_url: format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", origin),
        cancel_url: format!("{}/shop", origin),
        metadata: vec![(
            METADATA_SOURCE_KEY.to_string(),
            WEB_SOURCE_TAG.to_string(),
        )],
    };
    let session = payment_client
        .create_checkout_session(request)
        .await
        .map_err(|e| {
            OrderError::PaymentGatewayError("Failed to create checkout session".to_string(), e)
        })?;
    let url = match session.url {
        Some(url) => url,
        None => {
            return Err(OrderError::PaymentGatewayError(
                "Failed to create checkout session".to_string(),
                anyhow::anyhow!("Checkout session {} has no redirect URL", session.id),
            ))
        }
    };
    tracing::info!("Created checkout session {}", session.id);
    Ok(web::Json(GenericResponse::success(
        "Checkout session created successfully",
        Some(CheckoutSessionResponse { url }),
    )))
}
