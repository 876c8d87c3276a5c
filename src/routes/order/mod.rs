pub(crate) mod errors;
pub mod handlers;
mod routes;
pub(crate) mod schemas;
pub mod utils;
pub use routes::order_route;
