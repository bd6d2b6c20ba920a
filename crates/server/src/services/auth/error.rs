//! Authentication error types.

use thiserror::Error;

use agenda_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. One message for both cases - the
    /// response must not reveal whether the email exists.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email is already registered. Recoverable, distinct from generic
    /// validation failure.
    #[error("this email is already registered")]
    EmailTaken,

    /// Structurally invalid email at registration.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Credential store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
