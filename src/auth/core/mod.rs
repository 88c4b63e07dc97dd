//! Core auth services.

pub mod account_service;
pub mod password_service;
pub mod token_service;

pub use account_service::{AccountService, AuthSession};
pub use password_service::PasswordService;
pub use token_service::{Claims, TokenService};
