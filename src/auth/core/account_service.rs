//! Account lifecycle: registration, login and token resolution.

use std::sync::Arc;

use tracing::{info, warn};
use zeroize::Zeroizing;

use super::{PasswordService, TokenService};
use crate::auth::types::{LoginRequest, RegisterRequest};
use crate::errors::ApiError;
use crate::models::{normalize_email, Account, NewAccount};
use crate::storage::{AccountStore, StorageError};

/// A freshly authenticated account and its bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    passwords: Arc<PasswordService>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            accounts,
            passwords: Arc::new(passwords),
            tokens,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthSession, ApiError> {
        self.passwords.validate_strength(&req.password)?;

        let email = normalize_email(&req.email);
        if self.accounts.find_by_email(&email).await?.is_some() {
            warn!("registration refused: email already registered");
            return Err(ApiError::EmailExists);
        }

        let password_hash = self.hash(Zeroizing::new(req.password)).await?;
        let new_account = NewAccount {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email,
            phone: req.phone.trim().to_string(),
            birth_date: req.birth_date,
            password_hash,
        };

        // The pre-check can race with a concurrent registration; the unique
        // index has the final word.
        let account = match self.accounts.create(new_account).await {
            Ok(account) => account,
            Err(StorageError::UniqueViolation) => return Err(ApiError::EmailExists),
            Err(e) => return Err(e.into()),
        };

        let token = self.tokens.issue(account.id)?;
        info!(account_id = account.id, "account registered");
        Ok(AuthSession { account, token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession, ApiError> {
        let email = normalize_email(&req.email);
        let Some(record) = self.accounts.find_by_email(&email).await? else {
            warn!("login refused: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !record.account.is_active {
            warn!(account_id = record.account.id, "login refused: account deactivated");
            return Err(ApiError::AccountDeactivated);
        }

        let matches = self
            .verify(Zeroizing::new(req.password), record.password_hash)
            .await?;
        if !matches {
            warn!(account_id = record.account.id, "login refused: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.issue(record.account.id)?;
        info!(account_id = record.account.id, "login successful");
        Ok(AuthSession {
            account: record.account,
            token,
        })
    }

    /// Resolve a bearer token to a live account.
    ///
    /// The account is re-read on every call, so a deleted or deactivated
    /// account is refused even while its token is unexpired.
    pub async fn authenticate(&self, token: &str) -> Result<Account, ApiError> {
        let account_id = self.tokens.verify(token)?;

        match self.accounts.find_by_id(account_id).await? {
            Some(account) if account.is_active => Ok(account),
            Some(_) => {
                warn!(account_id, "token refused: account deactivated");
                Err(ApiError::Unauthorized)
            }
            None => {
                warn!(account_id, "token refused: account no longer exists");
                Err(ApiError::Unauthorized)
            }
        }
    }

    async fn hash(&self, password: Zeroizing<String>) -> Result<String, ApiError> {
        let passwords = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || passwords.hash_password(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify(&self, password: Zeroizing<String>, hash: String) -> Result<bool, ApiError> {
        let passwords = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || passwords.verify_password(&password, &hash))
            .await
            .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?
    }
}
