use actix_web::web;

use super::handlers::process_payment_webhook;

pub fn webhook_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/payment", web::post().to(process_payment_webhook));
}
