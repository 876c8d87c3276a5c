use actix_web::web;

use super::views::{submit_catering_quote, submit_membership_signup, subscribe_free_sample};

pub fn lead_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/catering_quote", web::post().to(submit_catering_quote));
    cfg.route("/membership_signup", web::post().to(submit_membership_signup));
    cfg.route("/subscribe", web::post().to(subscribe_free_sample));
}
