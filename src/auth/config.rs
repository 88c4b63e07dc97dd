//! Authentication settings.

use std::fmt;

use serde::Deserialize;

/// Shortest accepted HS256 signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Auth settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Empty means "not configured".
    pub jwt_secret: String,

    /// Token lifetime (seconds)
    pub token_expiry: u64,

    pub password: PasswordConfig,
}

/// Password policy and hashing cost.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_letter: bool,
    /// bcrypt work factor, 4..=31
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry: DEFAULT_TOKEN_EXPIRY_SECS,
            password: PasswordConfig::default(),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_digit: true,
            require_letter: true,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

// The secret never reaches logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("password", &self.password)
            .finish()
    }
}
