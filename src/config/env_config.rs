//! Environment overrides for [`AppConfig`].

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use super::AppConfig;

/// Read `key` and parse it. Unset or blank means "keep current value".
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {key}")),
        _ => Ok(None),
    }
}

fn override_with<T>(key: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(value) = env_parse(key)? {
        *slot = value;
    }
    Ok(())
}

impl AppConfig {
    /// Apply `HOST`, `PORT`, `DATABASE_URL`, `DB_MAX_CONNECTIONS`,
    /// `CORS_ALLOW_ORIGIN`, `JWT_SECRET`, `TOKEN_EXPIRY`, `BCRYPT_COST` and
    /// `PASSWORD_MIN_LENGTH`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        override_with("HOST", &mut self.server.host)?;
        override_with("PORT", &mut self.server.port)?;
        override_with("CORS_ALLOW_ORIGIN", &mut self.server.cors_allow_origin)?;
        override_with("DATABASE_URL", &mut self.database.url)?;
        override_with("DB_MAX_CONNECTIONS", &mut self.database.max_connections)?;
        override_with("JWT_SECRET", &mut self.auth.jwt_secret)?;
        override_with("TOKEN_EXPIRY", &mut self.auth.token_expiry)?;
        override_with("BCRYPT_COST", &mut self.auth.password.bcrypt_cost)?;
        override_with("PASSWORD_MIN_LENGTH", &mut self.auth.password.min_length)?;
        Ok(())
    }
}
