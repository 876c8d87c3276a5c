use crate::catalog::{ShippingOptionType, UpsellOffer};
use crate::errors::GenericError;
use actix_http::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RequestItem {
    pub id: String,
    pub quantity: i64,
}

/// Shipping fields arrive camelCased from the storefront form. Absent fields
/// deserialize to empty strings so validation can answer with one message
/// instead of a serde error per field.
#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreateWebRequest {
    #[serde(default)]
    pub items: Vec<RequestItem>,
    pub shipping: Option<ShippingInfo>,
    pub shipping_option: Option<ShippingOptionType>,
}

impl FromRequest for PaymentIntentCreateWebRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsellChargeWebRequest {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_size: Option<String>,
    /// Display amount from the offer screen. The charged amount is always
    /// resolved server side.
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub original_payment_intent_id: String,
}

impl FromRequest for UpsellChargeWebRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsellOfferWebRequest {
    #[serde(default)]
    pub cart_item_ids: Vec<String>,
}

impl FromRequest for UpsellOfferWebRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

/// Cart line as the storefront renders it. Only `id` and `quantity` are
/// trusted; `price` is advisory and the display fields pass through to the
/// hosted page.
#[derive(Deserialize, Debug, ToSchema)]
pub struct CheckoutSessionItem {
    pub id: String,
    pub quantity: i64,
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CheckoutSessionWebRequest {
    #[serde(default)]
    pub items: Vec<CheckoutSessionItem>,
}

impl FromRequest for CheckoutSessionWebRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreateResponse {
    pub client_secret: Option<String>,
    pub customer_id: String,
    pub payment_intent_id: String,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsellChargeResponse {
    pub payment_intent_id: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UpsellOfferResponse {
    pub offer: UpsellOffer,
    pub downsell: UpsellOffer,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

/// Where the shopper is in the purchase funnel. The client renders these
/// screens; the transition table in `utils` is the single description of
/// which moves are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Form,
    Processing,
    Upsell,
    Downsell,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEvent {
    SubmitPayment,
    PaymentSucceeded,
    PaymentFailed,
    AcceptOffer,
    DeclineOffer,
}
