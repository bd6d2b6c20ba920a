//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional in development; `AGENDA_JWT_SECRET` is required in production.
//!
//! - `AGENDA_DATABASE_PATH` - `SQLite` database file (fallback: `DATABASE_PATH`,
//!   default: `agenda.db`)
//! - `AGENDA_HOST` - Bind address (default: 127.0.0.1)
//! - `AGENDA_PORT` - Listen port (fallback: `PORT`, default: 5000)
//! - `AGENDA_JWT_SECRET` - Token signing key (min 32 chars in production)
//! - `AGENDA_TOKEN_TTL_SECS` - Token lifetime in seconds (default: 86400)
//! - `AGENDA_CORS_ORIGINS` - Comma-separated allowed origins
//!   (default: `http://localhost:3000,http://127.0.0.1:3000`)
//! - `AGENDA_ENV` - `development` or `production`; controls whether 500
//!   responses carry details or a generic message (default: development)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Signing key used when `AGENDA_JWT_SECRET` is unset in development.
/// Never accepted in production.
const DEV_JWT_SECRET: &str = "agenda-dev-signing-key-do-not-use-in-production";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment mode.
///
/// Controls error verbosity at the HTTP boundary: development responses carry
/// error details, production responses a generic message. Server-side logging
/// happens in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Returns the mode's wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}', expected 'development' or 'production'"
            )),
        }
    }
}

/// Agenda server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` database file location
    pub database_path: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Origins allowed to call the API cross-origin
    pub cors_origins: Vec<String>,
    /// Deployment mode (error verbosity)
    pub environment: Environment,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse, or if the signing
    /// secret is missing or too short in production mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = get_env_or_default("AGENDA_ENV", Environment::default().as_str())
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGENDA_ENV".to_string(), e))?;

        let database_path = PathBuf::from(get_database_path());
        let host = get_env_or_default("AGENDA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGENDA_HOST".to_string(), e.to_string()))?;
        let port = get_optional_env("AGENDA_PORT")
            .or_else(|| get_optional_env("PORT"))
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGENDA_PORT".to_string(), e.to_string()))?;

        let jwt_secret = get_jwt_secret(environment)?;

        let token_ttl_secs = get_env_or_default("AGENDA_TOKEN_TTL_SECS", "86400")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("AGENDA_TOKEN_TTL_SECS".to_string(), e.to_string())
            })?;

        let cors_origins = get_env_or_default(
            "AGENDA_CORS_ORIGINS",
            "http://localhost:3000,http://127.0.0.1:3000",
        )
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

        Ok(Self {
            database_path,
            host,
            port,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            cors_origins,
            environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get the database path with fallback to generic `DATABASE_PATH`.
fn get_database_path() -> String {
    get_optional_env("AGENDA_DATABASE_PATH")
        .or_else(|| get_optional_env("DATABASE_PATH"))
        .unwrap_or_else(|| "agenda.db".to_string())
}

/// Load and validate the token signing secret.
///
/// Production requires the variable and a minimum length; development falls
/// back to a fixed dev-only key so the server runs out of the box.
fn get_jwt_secret(environment: Environment) -> Result<SecretString, ConfigError> {
    match (get_optional_env("AGENDA_JWT_SECRET"), environment) {
        (Some(value), Environment::Production) => {
            if value.len() < MIN_JWT_SECRET_LENGTH {
                return Err(ConfigError::InsecureSecret(
                    "AGENDA_JWT_SECRET".to_string(),
                    format!(
                        "must be at least {} characters (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        value.len()
                    ),
                ));
            }
            Ok(SecretString::from(value))
        }
        (Some(value), Environment::Development) => Ok(SecretString::from(value)),
        (None, Environment::Production) => Err(ConfigError::MissingEnvVar(
            "AGENDA_JWT_SECRET".to_string(),
        )),
        (None, Environment::Development) => {
            tracing::warn!("AGENDA_JWT_SECRET not set, using the development signing key");
            Ok(SecretString::from(DEV_JWT_SECRET))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_jwt_secret_required_in_production() {
        // Runs without AGENDA_JWT_SECRET in the environment
        if std::env::var("AGENDA_JWT_SECRET").is_ok() {
            return;
        }
        let result = get_jwt_secret(Environment::Production);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_jwt_secret_dev_fallback() {
        if std::env::var("AGENDA_JWT_SECRET").is_ok() {
            return;
        }
        let secret = get_jwt_secret(Environment::Development).unwrap();
        assert_eq!(secret.expose_secret(), DEV_JWT_SECRET);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            database_path: PathBuf::from("agenda.db"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            jwt_secret: SecretString::from("x".repeat(32)),
            token_ttl: Duration::from_secs(86400),
            cors_origins: vec!["http://localhost:3000".to_string()],
            environment: Environment::Development,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }
}
