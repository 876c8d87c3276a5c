pub(crate) mod errors;
mod routes;
pub(crate) mod schemas;
pub mod views;
pub use routes::chat_route;
