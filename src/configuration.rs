use config::{self, ConfigError, Environment};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::EmailObject;
use crate::schemas::CurrencyType;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub payment: PaymentSettings,
    pub email_client: EmailClientSettings,
    pub notification: NotificationSettings,
    pub crm: CrmSettings,
    pub chat: ChatSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub storefront_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentSettings {
    pub base_url: String,
    pub secret_key: SecretString,
    pub webhook_secret: SecretString,
    pub currency: CurrencyType,
    pub timeout_milliseconds: u64,
}

impl PaymentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    pub sender_email: String,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<EmailObject, String> {
        EmailObject::parse(self.sender_email.clone())
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
            && !self.username.is_empty()
            && !self.password.expose_secret().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub order_email_recipient: String,
    pub slack_webhook_url: SecretString,
    pub command_center_base_url: String,
    pub command_center_api_key: SecretString,
    pub timeout_milliseconds: u64,
}

impl NotificationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrmSettings {
    pub base_url: String,
    pub api_key: SecretString,
    pub audience_id: String,
    pub timeout_milliseconds: u64,
}

impl CrmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// The data-center suffix of the API key decides the host when no
    /// explicit base URL is configured, e.g. `...-us21` maps to
    /// `https://us21.api.mailchimp.com/3.0`.
    pub fn resolved_base_url(&self) -> String {
        if !self.base_url.is_empty() {
            return self.base_url.clone();
        }
        let api_key = self.api_key.expose_secret();
        match api_key.rsplit_once('-') {
            Some((_, data_center)) if !data_center.is_empty() => {
                format!("https://{}.api.mailchimp.com/3.0", data_center)
            }
            _ => String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    Scripted,
    Llm,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatSettings {
    pub provider: ChatProvider,
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub history_limit: usize,
    pub timeout_milliseconds: u64,
}

impl ChatSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");
    let builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("configuration.yaml"),
        ))
        .add_source(Environment::default().separator("_"))
        .build()?;
    builder.try_deserialize::<Settings>()
}
