pub mod chat;
pub mod lead;
pub mod order;
mod route;
pub mod util;
pub mod webhook;
pub use chat::chat_route;
pub use lead::lead_route;
pub use order::order_route;
pub use route::main_route;
pub use util::util_route;
pub use webhook::webhook_route;
