pub mod app_state;
pub mod config;
pub mod cors;
pub mod error;
mod handlers;
pub mod models;
pub mod request;
pub mod response;
pub mod server;
pub mod store;

pub use handlers::{handle_connection, route, Endpoint, Welcome, RECENT_LIMIT, ROUTES};
