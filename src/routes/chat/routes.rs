use actix_web::web;

use super::views::chat_message;

pub fn chat_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/message", web::post().to(chat_message));
}
