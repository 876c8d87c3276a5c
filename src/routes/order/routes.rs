use actix_web::web;

use super::handlers::{
    charge_upsell, create_checkout_session, create_payment_intent, fetch_upsell_offer,
};

pub fn order_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/payment_intent/create", web::post().to(create_payment_intent));
    cfg.route("/upsell/charge", web::post().to(charge_upsell));
    cfg.route("/upsell/offer", web::post().to(fetch_upsell_offer));
    cfg.route(
        "/checkout_session/create",
        web::post().to(create_checkout_session),
    );
}
