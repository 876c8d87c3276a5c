pub(crate) mod errors;
pub mod handlers;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub mod utils;
pub use routes::webhook_route;
