use crate::chat_client::{GenericChatService, LlmChatService, ScriptedChatService};
use crate::command_center_client::CommandCenterClient;
use crate::configuration::{ApplicationSettings, ChatProvider, NotificationSettings, Settings};
use crate::crm_client::CrmClient;
use crate::email_client::GenericEmailService;
use crate::payment_client::PaymentClient;
use crate::routes::main_route;
use crate::schemas::CommunicationType;
use crate::slack_client::SlackClient;
use crate::utils::create_email_type_pool;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let email_type_pool = create_email_type_pool(configuration.email_client);
        let payment_client = PaymentClient::new(&configuration.payment);
        let slack_client = SlackClient::new(&configuration.notification);
        let command_center_client = CommandCenterClient::new(&configuration.notification);
        let crm_client = CrmClient::new(&configuration.crm);
        let chat_service: Arc<dyn GenericChatService> = match configuration.chat.provider {
            ChatProvider::Scripted => Arc::new(ScriptedChatService::new()),
            ChatProvider::Llm => Arc::new(LlmChatService::new(&configuration.chat)),
        };
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        println!("Listening {}", address);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();
        let server = run(
            listener,
            email_type_pool,
            payment_client,
            slack_client,
            command_center_client,
            crm_client,
            chat_service,
            configuration.notification,
            configuration.application,
        )
        .await?;
        // We "save" the bound port in one of `Application`'s fields
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    listener: TcpListener,
    email_type_pool: HashMap<CommunicationType, Arc<dyn GenericEmailService>>,
    payment_client: PaymentClient,
    slack_client: SlackClient,
    command_center_client: CommandCenterClient,
    crm_client: CrmClient,
    chat_service: Arc<dyn GenericChatService>,
    notification_settings: NotificationSettings,
    application_settings: ApplicationSettings,
) -> Result<Server, anyhow::Error> {
    let email_pool = web::Data::new(email_type_pool);
    let payment_client = web::Data::new(payment_client);
    let slack_client = web::Data::new(slack_client);
    let command_center_client = web::Data::new(command_center_client);
    let crm_client = web::Data::new(crm_client);
    let chat_service = web::Data::new(chat_service);
    let notification_settings = web::Data::new(notification_settings);
    let application_settings = web::Data::new(application_settings);
    let storefront_origin = application_settings.storefront_origin.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&storefront_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600);
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(email_pool.clone())
            .app_data(payment_client.clone())
            .app_data(slack_client.clone())
            .app_data(command_center_client.clone())
            .app_data(crm_client.clone())
            .app_data(chat_service.clone())
            .app_data(notification_settings.clone())
            .app_data(application_settings.clone())
            .configure(main_route)
    })
    .workers(4)
    .listen(listener)?
    .run();

    Ok(server)
}
