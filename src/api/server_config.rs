//! Server limits.

use std::time::Duration;

/// Concurrent in-flight requests.
pub const MAX_CONCURRENCY: usize = 256;

/// Request body limit (1 MiB).
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Preflight cache lifetime.
pub const CORS_MAX_AGE: Duration = Duration::from_secs(3600);
