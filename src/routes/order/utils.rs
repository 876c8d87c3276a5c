use std::borrow::Cow;

use anyhow::Context;

use super::errors::OrderError;
use super::schemas::{
    CheckoutEvent, CheckoutSessionItem, CheckoutStage, RequestItem, ShippingInfo,
};
use crate::catalog::{get_product_by_id, strip_upsell_suffix, upsell_unit_price, ShippingOptionType};
use crate::constants::{
    CHECKOUT_SOURCE_TAG, FREE_SAMPLE_PRODUCT_ID, LEAD_EMAIL_PATTERN,
    METADATA_CUSTOMER_EMAIL_KEY, METADATA_CUSTOMER_NAME_KEY, METADATA_ITEMS_KEY,
    METADATA_SHIPPING_ADDRESS_KEY, METADATA_SHIPPING_COST_KEY, METADATA_SHIPPING_OPTION_KEY,
    METADATA_SOURCE_KEY, ZIP_PATTERN,
};
use crate::payment_client::CheckoutSessionLineItem;
use crate::schemas::MetadataOrderItem;

/// A cart line after server-side resolution. Prices always come from the
/// catalog; the client never names its own.
#[derive(Debug, Clone)]
pub struct ValidatedCartLine {
    pub id: String,
    pub name: String,
    pub size: String,
    pub price: i64,
    pub quantity: i64,
}

/// Resolves every cart line against the catalog and totals the order.
/// Any unknown id rejects the whole request before the processor is touched.
pub fn validate_cart(items: &[RequestItem]) -> Result<(Vec<ValidatedCartLine>, i64), OrderError> {
    if items.is_empty() {
        return Err(OrderError::ValidationError("Cart is empty".to_string()));
    }
    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal: i64 = 0;
    for item in items {
        if item.quantity < 1 {
            return Err(OrderError::ValidationError(format!(
                "Invalid quantity for product: {}",
                item.id
            )));
        }
        let line = if item.id == FREE_SAMPLE_PRODUCT_ID {
            ValidatedCartLine {
                id: item.id.clone(),
                name: "FREE 2oz Jerk Sauce Sample".to_string(),
                size: "2oz".to_string(),
                price: 0,
                quantity: item.quantity,
            }
        } else {
            // An owned Cow means the upsell suffix was stripped, so the line
            // gets the discounted price of its base product.
            let (base_id, discounted) = match strip_upsell_suffix(&item.id) {
                Cow::Borrowed(id) => (id.to_string(), false),
                Cow::Owned(id) => (id, true),
            };
            let product = get_product_by_id(&base_id).ok_or_else(|| {
                OrderError::ValidationError(format!("Product not found: {}", item.id))
            })?;
            let price = if discounted {
                upsell_unit_price(product.price)
            } else {
                product.price
            };
            ValidatedCartLine {
                id: item.id.clone(),
                name: product.name.to_string(),
                size: product.size.to_string(),
                price,
                quantity: item.quantity,
            }
        };
        subtotal += line.price * line.quantity;
        lines.push(line);
    }
    Ok((lines, subtotal))
}

pub fn validate_shipping(shipping: Option<&ShippingInfo>) -> Result<&ShippingInfo, OrderError> {
    let shipping = match shipping {
        Some(shipping) => shipping,
        None => {
            return Err(OrderError::ValidationError(
                "Shipping info required".to_string(),
            ))
        }
    };
    let required = [
        &shipping.first_name,
        &shipping.last_name,
        &shipping.email,
        &shipping.address,
        &shipping.city,
        &shipping.state,
        &shipping.zip,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(OrderError::ValidationError(
            "Shipping info required".to_string(),
        ));
    }
    if !LEAD_EMAIL_PATTERN.is_match(&shipping.email) {
        return Err(OrderError::ValidationError(
            "Please provide a valid email address".to_string(),
        ));
    }
    if !ZIP_PATTERN.is_match(&shipping.zip) {
        return Err(OrderError::ValidationError(
            "Please provide a valid ZIP code".to_string(),
        ));
    }
    Ok(shipping)
}

/// Serializes the order summary onto the payment intent. The processor's
/// metadata is the only durable record of what was bought, so the webhook
/// rebuilds the whole notification from these keys.
pub fn build_intent_metadata(
    lines: &[ValidatedCartLine],
    shipping_option: ShippingOptionType,
    shipping_cost: i64,
    shipping: &ShippingInfo,
) -> Result<Vec<(String, String)>, anyhow::Error> {
    let items: Vec<MetadataOrderItem> = lines
        .iter()
        .map(|line| MetadataOrderItem {
            id: line.id.clone(),
            name: format!("{} ({})", line.name, line.size),
            price: line.price,
            quantity: line.quantity,
        })
        .collect();
    let items_json = serde_json::to_string(&items)
        .context("Failed to serialize the order items for intent metadata")?;
    Ok(vec![
        (
            METADATA_SOURCE_KEY.to_string(),
            CHECKOUT_SOURCE_TAG.to_string(),
        ),
        (METADATA_ITEMS_KEY.to_string(), items_json),
        (
            METADATA_SHIPPING_OPTION_KEY.to_string(),
            shipping_option.to_string(),
        ),
        (
            METADATA_SHIPPING_COST_KEY.to_string(),
            shipping_cost.to_string(),
        ),
        (
            METADATA_CUSTOMER_NAME_KEY.to_string(),
            format!("{} {}", shipping.first_name, shipping.last_name),
        ),
        (
            METADATA_CUSTOMER_EMAIL_KEY.to_string(),
            shipping.email.clone(),
        ),
        (
            METADATA_SHIPPING_ADDRESS_KEY.to_string(),
            format!(
                "{}, {}, {} {}",
                shipping.address, shipping.city, shipping.state, shipping.zip
            ),
        ),
    ])
}

/// Pairs the client's display fields with the resolved catalog lines for the
/// hosted checkout page. `lines` must come from `validate_cart` over the same
/// items, so the two slices are index-aligned.
pub fn build_session_line_items(
    items: &[CheckoutSessionItem],
    lines: &[ValidatedCartLine],
) -> Vec<CheckoutSessionLineItem> {
    items
        .iter()
        .zip(lines)
        .map(|(item, line)| {
            if let Some(price) = item.price {
                if price != line.price {
                    tracing::warn!(
                        "Client sent price {} for {} but the catalog resolves {}; using the catalog price",
                        price,
                        item.id,
                        line.price
                    );
                }
            }
            let name = match &item.name {
                Some(name) if !name.trim().is_empty() => name.clone(),
                _ => line.name.clone(),
            };
            let size = match &item.size {
                Some(size) if !size.trim().is_empty() => size.clone(),
                _ => line.size.clone(),
            };
            let image_url = item
                .image
                .clone()
                .filter(|url| url.starts_with("http"));
            CheckoutSessionLineItem {
                name: format!("{} ({})", name, size),
                image_url,
                unit_amount: line.price,
                quantity: line.quantity,
            }
        })
        .collect()
}

/// Single source of truth for the funnel: anything not listed here is an
/// illegal move and leaves the stage unchanged.
pub fn advance_stage(stage: CheckoutStage, event: CheckoutEvent) -> CheckoutStage {
    use CheckoutEvent::*;
    use CheckoutStage::*;
    match (stage, event) {
        (Form, SubmitPayment) => Processing,
        (Processing, PaymentSucceeded) => Upsell,
        (Processing, PaymentFailed) => Form,
        (Upsell, AcceptOffer) => Complete,
        (Upsell, DeclineOffer) => Downsell,
        (Downsell, AcceptOffer) => Complete,
        (Downsell, DeclineOffer) => Complete,
        (current, _) => current,
    }
}
