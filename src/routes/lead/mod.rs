pub(crate) mod errors;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub mod utils;
pub mod views;
pub use routes::lead_route;
