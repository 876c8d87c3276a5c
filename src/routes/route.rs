use crate::openapi::ApiDoc;
use crate::routes::{chat_route, lead_route, order_route, util_route, webhook_route};
use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn main_route(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();
    cfg.service(web::scope("/order").configure(order_route))
        .service(web::scope("/webhook").configure(webhook_route))
        .service(web::scope("/lead").configure(lead_route))
        .service(web::scope("/chat").configure(chat_route))
        .service(web::scope("/util").configure(util_route))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()));
}
