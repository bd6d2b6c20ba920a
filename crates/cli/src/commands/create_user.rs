//! User provisioning command.
//!
//! # Usage
//!
//! ```bash
//! agenda-cli create-user -n "Alice" -e alice@example.com -p secret123
//! ```
//!
//! Registers an account exactly as the API's register route would: the email
//! is validated, the password hashed with Argon2id, and a duplicate email is
//! reported as such. Run `agenda-cli init-db` first on a fresh store.

use thiserror::Error;

use agenda_server::config::{AppConfig, ConfigError};
use agenda_server::db;
use agenda_server::services::auth::{AuthError, AuthService};

/// Errors that can occur while creating a user.
#[derive(Debug, Error)]
pub enum CreateUserError {
    /// Configuration failed to load.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration failed (invalid email, duplicate email, ...).
    #[error("Registration error: {0}")]
    Auth(#[from] AuthError),

    /// Empty field.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Create a new user account.
///
/// # Errors
///
/// Returns `CreateUserError` if a field is empty, the email is invalid or
/// already registered, or the store is unreachable.
pub async fn run(name: &str, email: &str, password: &str) -> Result<(), CreateUserError> {
    dotenvy::dotenv().ok();

    if name.is_empty() {
        return Err(CreateUserError::EmptyField("name"));
    }
    if password.is_empty() {
        return Err(CreateUserError::EmptyField("password"));
    }

    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_path).await?;

    let auth = AuthService::new(&pool);
    let user = auth.register(name, email, password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(())
}
