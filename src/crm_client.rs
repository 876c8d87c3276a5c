use md5::{Digest, Md5};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::configuration::CrmSettings;

/// Upserts subscribers into the mailing-list CRM. Everything here is best
/// effort, a missing configuration or a CRM outage never fails the caller.
#[derive(Debug)]
pub struct CrmClient {
    http_client: Client,
    base_url: String,
    api_key: SecretString,
    audience_id: String,
}

impl CrmClient {
    #[tracing::instrument]
    pub fn new(crm_config: &CrmSettings) -> Self {
        let http_client = Client::builder()
            .timeout(crm_config.timeout())
            .build()
            .unwrap();
        Self {
            http_client,
            base_url: crm_config.resolved_base_url(),
            api_key: crm_config.api_key.clone(),
            audience_id: crm_config.audience_id.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
            && !self.api_key.expose_secret().is_empty()
            && !self.audience_id.is_empty()
    }

    /// Member ids are the MD5 of the lowercased email, which makes the PUT
    /// an idempotent create-or-update.
    fn subscriber_hash(email: &str) -> String {
        hex::encode(Md5::digest(email.to_lowercase().as_bytes()))
    }

    pub async fn upsert_subscriber(
        &self,
        email: &str,
        first_name: &str,
        phone: Option<&str>,
    ) -> Result<(), anyhow::Error> {
        if !self.is_configured() {
            tracing::info!("CRM credentials are not set, skipping the list subscription");
            return Ok(());
        }
        let url = format!(
            "{}/lists/{}/members/{}",
            self.base_url,
            self.audience_id,
            Self::subscriber_hash(email)
        );
        let mut merge_fields = serde_json::Map::new();
        merge_fields.insert("FNAME".to_string(), json!(first_name));
        if let Some(phone) = phone {
            merge_fields.insert("PHONE".to_string(), json!(phone));
        }
        let request_body = json!({
            "email_address": email,
            "status": "subscribed",
            "merge_fields": merge_fields,
            "tags": ["free-sample"],
        });
        let response = self
            .http_client
            .put(&url)
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("CRM returned {}: {}", status, body))
        }
    }
}
