//! HTTP layer.

pub mod extract;
pub mod handlers;
pub mod server;
pub mod server_config;
pub mod types;
pub mod validators;

pub use server::{create_router, AppState, SpaServer};
