use jamaica_house_backend::{
    configuration::{get_configuration, ChatProvider},
    payment_client::PaymentClient,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use secrecy::SecretString;

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    payment_client: PaymentClient,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Produces a signature header the webhook endpoint accepts for `payload`.
    pub fn sign_webhook_payload(&self, payload: &[u8]) -> String {
        self.payment_client
            .sign_webhook_payload(payload, chrono::Utc::now().timestamp())
    }
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    let test_log = std::env::var("TEST_LOG")
        .map(|value| value == "true")
        .unwrap_or(false);
    if test_log {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = 0;
        // Every outbound channel stays unconfigured so the suite runs offline;
        // the clients log a skip and report success.
        c.email_client.base_url = String::new();
        c.email_client.username = String::new();
        c.email_client.password = SecretString::from("");
        c.notification.slack_webhook_url = SecretString::from("");
        c.notification.command_center_base_url = String::new();
        c.notification.command_center_api_key = SecretString::from("");
        c.crm.base_url = String::new();
        c.crm.api_key = SecretString::from("");
        c.chat.provider = ChatProvider::Scripted;
        c.payment.webhook_secret = SecretString::from("whsec_integration_test_secret");
        c
    };
    let payment_client = PaymentClient::new(&configuration.payment);
    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let application_port = application.port();

    let address = format!("http://127.0.0.1:{}", application_port);
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        port: application_port,
        api_client: reqwest::Client::new(),
        payment_client,
    }
}
