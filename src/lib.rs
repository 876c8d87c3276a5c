pub mod catalog;
pub mod chat_client;
pub mod command_center_client;
pub mod configuration;
pub mod constants;
pub mod crm_client;
pub mod domain;
pub mod email_client;
pub mod errors;
pub mod openapi;
pub mod payment_client;
pub mod routes;
pub mod schemas;
pub mod slack_client;
pub mod startup;
pub mod telemetry;
pub mod utils;
