//! Shared error types for the services crate.
//!
//! Every variant maps to one kind in the API error taxonomy; handlers match
//! on the variant, never on the message text.

use thiserror::Error;

use storage::repository::StorageError;

use crate::credentials::CredentialError;

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountServiceError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("account not found")]
    NotFound,
    #[error("incorrect password")]
    InvalidCredentials,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `VocalService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VocalServiceError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("invalid status: {value}")]
    InvalidStatus { value: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ChallengeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChallengeServiceError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("invalid status: {value}")]
    InvalidStatus { value: String },
    #[error("no challenges available for level {level}")]
    NoChallengesAvailable { level: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
