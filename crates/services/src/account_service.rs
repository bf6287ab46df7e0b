use std::sync::Arc;

use coach_core::model::{AccountSummary, LoginIdentifier};
use storage::repository::{AccountRepository, NewAccountRecord, StorageError};

use crate::Clock;
use crate::credentials::CredentialService;
use crate::error::AccountServiceError;

/// Raw registration input as received from the client.
///
/// Fields arrive as `Option` so that a missing or empty field surfaces as a
/// structured validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw login input. `username` takes precedence when both identifiers are
/// supplied.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A successful login: stateless session token plus the account view.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub account: AccountSummary,
}

/// Registration and login over the account repository.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    accounts: Arc<dyn AccountRepository>,
    credentials: CredentialService,
}

fn require(
    value: Option<String>,
    field: &'static str,
) -> Result<String, AccountServiceError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AccountServiceError::MissingField { field }),
    }
}

impl AccountService {
    #[must_use]
    pub fn new(
        clock: Clock,
        accounts: Arc<dyn AccountRepository>,
        credentials: CredentialService,
    ) -> Self {
        Self {
            clock,
            accounts,
            credentials,
        }
    }

    /// Create a new account from raw client input.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when any field is absent or empty,
    /// `DuplicateEmail` when the email uniqueness constraint is violated,
    /// `Credential` if hashing fails, and `Storage` for other persistence
    /// failures.
    pub async fn register(
        &self,
        input: RegistrationInput,
    ) -> Result<AccountSummary, AccountServiceError> {
        let name = require(input.name, "name")?;
        let email = require(input.email, "email")?;
        let password = require(input.password, "password")?;

        let password_hash = self.credentials.hash_password(&password)?;
        let record = NewAccountRecord {
            display_name: name.clone(),
            email: email.clone(),
            password_hash,
            created_at: self.clock.now(),
        };

        let id = match self.accounts.insert_account(record).await {
            Ok(id) => id,
            Err(StorageError::Conflict) => return Err(AccountServiceError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        Ok(AccountSummary { id, name, email })
    }

    /// Verify credentials and issue a 24-hour session token.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when no identifier or no password is supplied,
    /// `NotFound` when no account matches the identifier,
    /// `InvalidCredentials` when the password does not match, and
    /// `Credential`/`Storage` for hashing or persistence failures.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, AccountServiceError> {
        let identifier = match (input.username, input.email) {
            (Some(name), _) if !name.is_empty() => LoginIdentifier::Name(name),
            (_, Some(email)) if !email.is_empty() => LoginIdentifier::Email(email),
            _ => {
                return Err(AccountServiceError::MissingField {
                    field: "username or email",
                });
            }
        };
        let password = require(input.password, "password")?;

        let account = self
            .accounts
            .find_account(&identifier)
            .await?
            .ok_or(AccountServiceError::NotFound)?;

        if !self
            .credentials
            .verify_password(&password, account.password_hash())?
        {
            return Err(AccountServiceError::InvalidCredentials);
        }

        let summary = account.summary();
        let token = self.credentials.issue_token(&summary, self.clock.now())?;
        Ok(LoginOutcome {
            token,
            account: summary,
        })
    }
}
