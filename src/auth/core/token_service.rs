//! JWT issue and verification (HS256).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::auth::config::MIN_SECRET_LEN;
use crate::auth::errors::{SecretError, TokenError};
use crate::errors::ApiError;

/// JWT claims. `id` is the only identity claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Token issuer/verifier.
pub struct TokenService {
    /// Signing secret (zeroized on drop)
    secret: Zeroizing<String>,

    /// Token lifetime (seconds)
    expiry: i64,
}

impl TokenService {
    /// Build the service, refusing empty or short secrets.
    pub fn new(secret: &str, expiry_secs: u64) -> Result<Self, SecretError> {
        if secret.is_empty() {
            return Err(SecretError::Empty);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(SecretError::TooShort(secret.len()));
        }

        Ok(Self {
            secret: Zeroizing::new(secret.to_owned()),
            expiry: i64::try_from(expiry_secs).unwrap_or(i64::MAX),
        })
    }

    /// Issue a token for `account_id`, valid from now.
    pub fn issue(&self, account_id: i64) -> Result<String, ApiError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as if it were `issued_at`.
    pub fn issue_at(&self, account_id: i64, issued_at: DateTime<Utc>) -> Result<String, ApiError> {
        let exp = Duration::try_seconds(self.expiry)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let claims = Claims {
            id: account_id,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the account id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims.id)
        .map_err(|e| {
            let kind = match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            };
            debug!(reason = %kind, "token rejected");
            kind
        })
    }
}
