use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use uuid::Uuid;

use crate::catalog::ShippingOptionType;
use crate::configuration::PaymentSettings;
use crate::routes::order::schemas::ShippingInfo;
use crate::schemas::CurrencyType;

const SIGNATURE_TOLERANCE_SECONDS: i64 = 300;

#[derive(Debug)]
pub struct PaymentClient {
    http_client: Client,
    base_url: String,
    secret_key: SecretString,
    webhook_secret: SecretString,
    currency: CurrencyType,
}

#[derive(Debug)]
pub struct PaymentIntentCreateRequest {
    pub amount: i64,
    pub currency: CurrencyType,
    pub customer: Option<String>,
    pub setup_future_usage: Option<String>,
    pub payment_method: Option<String>,
    pub off_session: bool,
    pub confirm: bool,
    pub automatic_payment_methods: bool,
    pub metadata: Vec<(String, String)>,
}

impl PaymentIntentCreateRequest {
    fn to_form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), self.amount.to_string()),
            ("currency".to_string(), self.currency.to_string()),
        ];
        if self.automatic_payment_methods {
            params.push((
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ));
        }
        if let Some(customer) = &self.customer {
            params.push(("customer".to_string(), customer.clone()));
        }
        if let Some(setup_future_usage) = &self.setup_future_usage {
            params.push(("setup_future_usage".to_string(), setup_future_usage.clone()));
        }
        if let Some(payment_method) = &self.payment_method {
            params.push(("payment_method".to_string(), payment_method.clone()));
        }
        if self.off_session {
            params.push(("off_session".to_string(), "true".to_string()));
        }
        if self.confirm {
            params.push(("confirm".to_string(), "true".to_string()));
        }
        for (key, value) in &self.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }
        params
    }
}

#[derive(Debug)]
pub struct CheckoutSessionLineItem {
    pub name: String,
    pub image_url: Option<String>,
    pub unit_amount: i64,
    pub quantity: i64,
}

#[derive(Debug)]
pub struct CheckoutSessionCreateRequest {
    pub line_items: Vec<CheckoutSessionLineItem>,
    pub include_free_shipping: bool,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

impl CheckoutSessionCreateRequest {
    fn to_form_params(&self, currency: CurrencyType) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            (
                "shipping_address_collection[allowed_countries][0]".to_string(),
                "US".to_string(),
            ),
        ];
        for (index, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", index);
            params.push((
                format!("{}[price_data][currency]", prefix),
                currency.to_string(),
            ));
            params.push((
                format!("{}[price_data][product_data][name]", prefix),
                item.name.clone(),
            ));
            // The gateway rejects relative image paths.
            if let Some(image_url) = &item.image_url {
                params.push((
                    format!("{}[price_data][product_data][images][0]", prefix),
                    image_url.clone(),
                ));
            }
            params.push((
                format!("{}[price_data][unit_amount]", prefix),
                item.unit_amount.to_string(),
            ));
            params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }
        let mut tier = 0;
        if self.include_free_shipping {
            push_shipping_option(&mut params, tier, 0, "Free Shipping", 5, 7, currency);
            tier += 1;
        }
        push_shipping_option(
            &mut params,
            tier,
            ShippingOptionType::Standard.rate(),
            "Standard Shipping",
            5,
            7,
            currency,
        );
        tier += 1;
        push_shipping_option(
            &mut params,
            tier,
            ShippingOptionType::Express.rate(),
            "Express Shipping",
            2,
            3,
            currency,
        );
        for (key, value) in &self.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }
        params
    }
}

fn push_shipping_option(
    params: &mut Vec<(String, String)>,
    index: usize,
    amount: i64,
    display_name: &str,
    min_days: u8,
    max_days: u8,
    currency: CurrencyType,
) {
    let prefix = format!("shipping_options[{}][shipping_rate_data]", index);
    params.push((format!("{}[type]", prefix), "fixed_amount".to_string()));
    params.push((format!("{}[fixed_amount][amount]", prefix), amount.to_string()));
    params.push((
        format!("{}[fixed_amount][currency]", prefix),
        currency.to_string(),
    ));
    params.push((format!("{}[display_name]", prefix), display_name.to_string()));
    params.push((
        format!("{}[delivery_estimate][minimum][unit]", prefix),
        "business_day".to_string(),
    ));
    params.push((
        format!("{}[delivery_estimate][minimum][value]", prefix),
        min_days.to_string(),
    ));
    params.push((
        format!("{}[delivery_estimate][maximum][unit]", prefix),
        "business_day".to_string(),
    ));
    params.push((
        format!("{}[delivery_estimate][maximum][value]", prefix),
        max_days.to_string(),
    ));
}

#[derive(Debug, Deserialize)]
pub struct PaymentCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub customer: Option<String>,
    pub client_secret: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    pub customer_details: Option<SessionCustomerDetails>,
    pub collected_information: Option<SessionCollectedInformation>,
    pub shipping_cost: Option<SessionShippingCost>,
    pub line_items: Option<SessionLineItems>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionCustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionCollectedInformation {
    pub shipping_details: Option<SessionShippingDetails>,
}

#[derive(Debug, Deserialize)]
pub struct SessionShippingDetails {
    pub name: Option<String>,
    pub address: Option<SessionAddress>,
}

#[derive(Debug, Deserialize)]
pub struct SessionAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionShippingCost {
    pub amount_total: i64,
}

#[derive(Debug, Deserialize)]
pub struct SessionLineItems {
    pub data: Vec<SessionLineItem>,
}

#[derive(Debug, Deserialize)]
pub struct SessionLineItem {
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub amount_total: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorEnvelope {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: Option<String>,
}

async fn deserialize_gateway_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, anyhow::Error> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        serde_json::from_str::<T>(&body)
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse response: {}", err)))
    } else {
        let message = serde_json::from_str::<GatewayErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| format!("Payment gateway returned {}", status));
        Err(anyhow::anyhow!(message))
    }
}

impl PaymentClient {
    #[tracing::instrument]
    pub fn new(payment_config: &PaymentSettings) -> Self {
        tracing::info!("Establishing connection to the payment server.");
        let http_client = Client::builder()
            .timeout(payment_config.timeout())
            .build()
            .unwrap();
        Self {
            http_client,
            base_url: payment_config.base_url.clone(),
            secret_key: payment_config.secret_key.clone(),
            webhook_secret: payment_config.webhook_secret.clone(),
            currency: payment_config.currency,
        }
    }

    fn get_auth_token(&self) -> String {
        format!("Bearer {}", self.secret_key.expose_secret())
    }

    /// The saved payment method (`setup_future_usage`) is what allows the
    /// post-purchase offers to charge without the customer re-entering a card.
    pub fn generate_intent_create_request(
        &self,
        amount: i64,
        customer: Option<String>,
        metadata: Vec<(String, String)>,
    ) -> PaymentIntentCreateRequest {
        PaymentIntentCreateRequest {
            amount,
            currency: self.currency,
            customer,
            setup_future_usage: Some("off_session".to_string()),
            payment_method: None,
            off_session: false,
            confirm: false,
            automatic_payment_methods: true,
            metadata,
        }
    }

    /// Builds a charge that confirms immediately against a saved payment
    /// method, with no customer present.
    pub fn generate_off_session_charge_request(
        &self,
        amount: i64,
        customer: String,
        payment_method: String,
        metadata: Vec<(String, String)>,
    ) -> PaymentIntentCreateRequest {
        PaymentIntentCreateRequest {
            amount,
            currency: self.currency,
            customer: Some(customer),
            setup_future_usage: None,
            payment_method: Some(payment_method),
            off_session: true,
            confirm: true,
            automatic_payment_methods: false,
            metadata,
        }
    }

    pub async fn create_customer(
        &self,
        shipping: &ShippingInfo,
    ) -> Result<PaymentCustomer, anyhow::Error> {
        let url = format!("{}/customers", self.base_url);
        let params = vec![
            ("email".to_string(), shipping.email.clone()),
            (
                "name".to_string(),
                format!("{} {}", shipping.first_name, shipping.last_name),
            ),
            ("address[line1]".to_string(), shipping.address.clone()),
            ("address[city]".to_string(), shipping.city.clone()),
            ("address[state]".to_string(), shipping.state.clone()),
            ("address[postal_code]".to_string(), shipping.zip.clone()),
            ("address[country]".to_string(), "US".to_string()),
        ];
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .form(&params)
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    pub async fn retrieve_customer(
        &self,
        customer_id: &str,
    ) -> Result<PaymentCustomer, anyhow::Error> {
        let url = format!("{}/customers/{}", self.base_url, customer_id);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.get_auth_token())
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    pub async fn create_payment_intent(
        &self,
        request_body: PaymentIntentCreateRequest,
    ) -> Result<PaymentIntent, anyhow::Error> {
        let url = format!("{}/payment_intents", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&request_body.to_form_params())
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    pub async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, anyhow::Error> {
        let url = format!("{}/payment_intents/{}", self.base_url, payment_intent_id);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.get_auth_token())
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    pub async fn create_checkout_session(
        &self,
        request_body: CheckoutSessionCreateRequest,
    ) -> Result<CheckoutSession, anyhow::Error> {
        let url = format!("{}/checkout/sessions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .form(&request_body.to_form_params(self.currency))
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, anyhow::Error> {
        let url = format!("{}/checkout/sessions/{}", self.base_url, session_id);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.get_auth_token())
            .query(&[
                ("expand[]", "line_items"),
                ("expand[]", "collected_information"),
            ])
            .send()
            .await?;
        deserialize_gateway_response(response).await
    }

    /// Checks the `t=<unix>,v1=<hex>` signature header against an HMAC-SHA256
    /// of `"{timestamp}.{payload}"`. Stale timestamps fail verification so a
    /// captured request cannot be replayed later.
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<bool, anyhow::Error> {
        let mut timestamp: Option<&str> = None;
        let mut signature: Option<&str> = None;
        for part in signature_header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => signature = Some(value),
                _ => {}
            }
        }
        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("Signature header has no timestamp"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("Signature header has no v1 signature"))?;

        let sent_at = timestamp
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Signature timestamp is not an integer"))?;
        if (Utc::now().timestamp() - sent_at).abs() > SIGNATURE_TOLERANCE_SECONDS {
            return Ok(false);
        }

        let signature_bytes = hex::decode(signature)
            .map_err(|_| anyhow::anyhow!("Signature is not valid hex"))?;
        let mut mac = Hmac::<Sha256>::new_from_slice(self.webhook_secret.expose_secret().as_bytes())
            .map_err(|err| anyhow::anyhow!("Failed to initialise signature verifier: {}", err))?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.verify_slice(&signature_bytes).is_ok())
    }

    /// Counterpart of `verify_webhook_signature`, used by tests and local
    /// tooling to produce a header the verifier accepts.
    pub fn sign_webhook_payload(&self, payload: &[u8], sent_at: i64) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.webhook_secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(sent_at.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("t={},v1={}", sent_at, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_client() -> PaymentClient {
        PaymentClient::new(&PaymentSettings {
            base_url: "https://payments.test".to_string(),
            secret_key: SecretString::from("sk_test_key"),
            webhook_secret: SecretString::from("whsec_test_secret"),
            currency: CurrencyType::Usd,
            timeout_milliseconds: 2000,
        })
    }

    #[test]
    fn test_signature_round_trip_verifies() {
        let client = get_test_client();
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let header = client.sign_webhook_payload(payload, Utc::now().timestamp());
        let verified = client
            .verify_webhook_signature(payload, &header)
            .expect("well-formed header should not error");
        assert!(verified);
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let client = get_test_client();
        let header = client.sign_webhook_payload(b"amount=1798", Utc::now().timestamp());
        let verified = client
            .verify_webhook_signature(b"amount=9999", &header)
            .expect("well-formed header should not error");
        assert!(!verified);
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let client = get_test_client();
        let other_client = PaymentClient::new(&PaymentSettings {
            base_url: "https://payments.test".to_string(),
            secret_key: SecretString::from("sk_test_key"),
            webhook_secret: SecretString::from("whsec_other_secret"),
            currency: CurrencyType::Usd,
            timeout_milliseconds: 2000,
        });
        let payload = b"{}";
        let header = other_client.sign_webhook_payload(payload, Utc::now().timestamp());
        let verified = client
            .verify_webhook_signature(payload, &header)
            .expect("well-formed header should not error");
        assert!(!verified);
    }

    #[test]
    fn test_signature_rejects_stale_timestamp() {
        let client = get_test_client();
        let payload = b"{}";
        let stale = Utc::now().timestamp() - SIGNATURE_TOLERANCE_SECONDS - 60;
        let header = client.sign_webhook_payload(payload, stale);
        let verified = client
            .verify_webhook_signature(payload, &header)
            .expect("well-formed header should not error");
        assert!(!verified);
    }

    #[test]
    fn test_signature_errors_on_malformed_header() {
        let client = get_test_client();
        let payload = b"{}";
        assert!(client.verify_webhook_signature(payload, "").is_err());
        assert!(client
            .verify_webhook_signature(payload, "v1=abcdef")
            .is_err());
        assert!(client
            .verify_webhook_signature(payload, "t=1700000000")
            .is_err());
        assert!(client
            .verify_webhook_signature(payload, "t=not-a-number,v1=abcdef")
            .is_err());
        let now = Utc::now().timestamp();
        let header = format!("t={},v1=zz-not-hex", now);
        assert!(client.verify_webhook_signature(payload, &header).is_err());
    }

    #[test]
    fn test_off_session_charge_form_params() {
        let client = get_test_client();
        let request = client.generate_off_session_charge_request(
            1599,
            "cus_test_123".to_string(),
            "pm_test_123".to_string(),
            vec![("source".to_string(), "test".to_string())],
        );
        let params = request.to_form_params();
        let find = |key: &str| {
            params
                .iter()
                .find(|(param, _)| param == key)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(find("amount"), Some("1599"));
        assert_eq!(find("currency"), Some("usd"));
        assert_eq!(find("customer"), Some("cus_test_123"));
        assert_eq!(find("payment_method"), Some("pm_test_123"));
        assert_eq!(find("off_session"), Some("true"));
        assert_eq!(find("confirm"), Some("true"));
        assert_eq!(find("metadata[source]"), Some("test"));
        // A confirmed off-session charge never re-saves the payment method.
        assert_eq!(find("setup_future_usage"), None);
        assert_eq!(find("automatic_payment_methods[enabled]"), None);
    }

    #[test]
    fn test_intent_create_form_params_save_the_card() {
        let client = get_test_client();
        let request = client.generate_intent_create_request(
            1798,
            Some("cus_test_123".to_string()),
            vec![],
        );
        let params = request.to_form_params();
        let find = |key: &str| {
            params
                .iter()
                .find(|(param, _)| param == key)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(find("amount"), Some("1798"));
        assert_eq!(find("setup_future_usage"), Some("off_session"));
        assert_eq!(find("automatic_payment_methods[enabled]"), Some("true"));
        assert_eq!(find("off_session"), None);
        assert_eq!(find("confirm"), None);
    }
}
