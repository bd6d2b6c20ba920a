//! Unified error handling at the route boundary.
//!
//! Provides a unified `AppError` type mapping the error taxonomy onto HTTP
//! statuses. All route handlers return `Result<T, AppError>`; nothing
//! propagates uncaught past the router.
//!
//! Server-side faults (500) are always logged. Their response body depends on
//! the deployment mode installed at startup: detailed in development, a
//! generic message in production.

use std::sync::OnceLock;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::Environment;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::token::TokenError;

static ERROR_MODE: OnceLock<Environment> = OnceLock::new();

/// Install the deployment mode used to render 500 bodies.
///
/// Called once at startup; later calls are ignored. Before installation the
/// mode defaults to production (generic messages).
pub fn install_error_mode(mode: Environment) {
    let _ = ERROR_MODE.set(mode);
}

fn error_mode() -> Environment {
    ERROR_MODE.get().copied().unwrap_or(Environment::Production)
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request field, bad enum value, bad date/time format.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Token verification or signing failed.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Entity absent or owned by another user - the two are indistinguishable.
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Token(err) => match err {
                TokenError::Expired | TokenError::Invalid => StatusCode::UNAUTHORIZED,
                TokenError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server faults are always logged, whatever the deployment mode
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            match error_mode() {
                Environment::Development => self.to_string(),
                Environment::Production => "internal server error".to_string(),
            }
        } else {
            match &self {
                Self::Validation(msg) => msg.clone(),
                Self::Auth(err) => err.to_string(),
                Self::Token(err) => err.to_string(),
                Self::NotFound(what) => (*what).to_string(),
                Self::Database(_) | Self::Internal(_) => unreachable!("handled above"),
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
