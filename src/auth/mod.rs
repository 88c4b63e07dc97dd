//! Authentication and authorization.
//!
//! ```text
//! auth/
//! ├── config.rs         # AuthConfig, PasswordConfig
//! ├── errors.rs         # TokenError, SecretError
//! ├── types.rs          # request/response bodies
//! ├── middleware.rs     # require_auth, require_admin, CurrentUser
//! ├── core/
//! │   ├── password_service.rs
//! │   ├── token_service.rs
//! │   └── account_service.rs
//! └── api/
//!     ├── handlers.rs
//!     └── routes.rs
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod errors;
pub mod middleware;
pub mod types;

pub use api::create_auth_routes;
pub use config::{AuthConfig, PasswordConfig};
pub use self::core::{AccountService, AuthSession, PasswordService, TokenService};
pub use errors::{SecretError, TokenError};
pub use middleware::{require_admin, require_auth, CurrentUser};
pub use types::{AuthResponse, LoginRequest, RegisterRequest};
