//! Database schema initialization command.
//!
//! # Usage
//!
//! ```bash
//! agenda-cli init-db
//! ```
//!
//! Creates the `users`, `appointments`, and `tasks` tables plus their
//! supporting indexes. Every statement uses `IF NOT EXISTS`, so running this
//! against an already-initialized store is a no-op. The server never runs
//! this automatically - initialization is an explicit operational step.
//!
//! # Environment Variables
//!
//! - `AGENDA_DATABASE_PATH` - `SQLite` database file (default: `agenda.db`)

use thiserror::Error;

use agenda_server::config::{AppConfig, ConfigError};
use agenda_server::db;

/// Errors that can occur during schema initialization.
#[derive(Debug, Error)]
pub enum InitDbError {
    /// Configuration failed to load.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Initialize the database schema.
///
/// # Errors
///
/// Returns `InitDbError` if configuration fails to load or a schema
/// statement fails.
pub async fn run() -> Result<(), InitDbError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing::info!(path = %config.database_path.display(), "Connecting to database");
    let pool = db::create_pool(&config.database_path).await?;

    tracing::info!("Initializing schema");
    db::init_schema(&pool).await?;

    tracing::info!("Schema initialized");
    Ok(())
}
