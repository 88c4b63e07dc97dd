//! AquaLux Spa booking backend.
//!
//! ```text
//! config/    AppConfig: TOML file + environment overrides
//! errors.rs  ApiError, the single error envelope translation
//! models/    Account, SpaService, Booking and their write payloads
//! storage/   store traits + SQLite implementation
//! auth/      password hashing, JWT issue/verify, middleware, auth routes
//! api/       router, layers, extractors and CRUD handlers
//! ```
//!
//! Request flow: `require_auth` → `require_admin` (optional) → handler → store.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod storage;

pub use api::server::{create_router, AppState, SpaServer};
pub use config::AppConfig;
pub use errors::{ApiError, ApiResult};
pub use storage::SqliteStorage;
