use crate::configuration::EmailClientSettings;
use crate::email_client::{DummyEmailClient, GenericEmailService, SmtpEmailClient};
use crate::schemas::CommunicationType;
use bigdecimal::{num_bigint::BigInt, BigDecimal};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn fmt_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", serde_json::to_string(value).unwrap())
}

#[macro_export]
macro_rules! impl_serialize_format {
    ($struct_name:ident, $trait_name:path) => {
        impl $trait_name for $struct_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_json(self, f)
            }
        }
    };
}

/// Converts an amount in integer cents to its dollar value.
pub fn cents_to_dollars(minor_units: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(minor_units), 2)
}

/// Renders an amount in integer cents as a display string, e.g. `$12.98`.
pub fn format_usd(minor_units: i64) -> String {
    format!("${}", cents_to_dollars(minor_units))
}

pub fn create_email_type_pool(
    email_config: EmailClientSettings,
) -> HashMap<CommunicationType, Arc<dyn GenericEmailService>> {
    let email_client: Arc<dyn GenericEmailService> = if email_config.is_configured() {
        Arc::new(SmtpEmailClient::new(&email_config).expect("Failed to create SmtpEmailClient"))
    } else {
        tracing::warn!("SMTP credentials are not set, using the dummy email client");
        Arc::new(DummyEmailClient::new().expect("Failed to create DummyEmailClient"))
    };

    let mut email_services = HashMap::new();
    email_services.insert(CommunicationType::OrderReceipt, email_client.clone());
    email_services.insert(CommunicationType::LeadAlert, email_client);

    email_services
}
