//! Database operations for the Agenda `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Account identity (name, unique email, Argon2 password hash)
//! - `appointments` - Date/time events, owner-scoped
//! - `tasks` - Priority/status items with optional due dates, owner-scoped
//!
//! Both entity tables reference `users` with `ON DELETE CASCADE`; foreign
//! keys are enabled on every connection.
//!
//! # Schema initialization
//!
//! [`init_schema`] is idempotent (`IF NOT EXISTS` throughout) and runs
//! independently of server startup:
//!
//! ```bash
//! cargo run -p agenda-cli -- init-db
//! ```

pub mod entities;
pub mod users;

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness constraint violated (duplicate email). Recoverable - maps
    /// to a 4xx at the API boundary, unlike other storage failures.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing and foreign keys are enabled on
/// every connection so cascade deletes apply.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create an in-memory pool for tests.
///
/// Capped at a single connection: each `SQLite` `:memory:` connection is its
/// own database, so a larger pool would hand out empty databases.
///
/// # Errors
///
/// Returns `sqlx::Error` if the in-memory database cannot be opened.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Schema statements, executed in order. Timestamps default to millisecond
/// precision so `updated_at` refreshes are observable within one second.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )",
    "CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        priority TEXT NOT NULL DEFAULT 'medium'
            CHECK (priority IN ('low', 'medium', 'high')),
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'in_progress', 'completed')),
        due_date TEXT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority)",
];

/// Initialize the database schema.
///
/// Safe to run against an already-initialized store.
///
/// # Errors
///
/// Returns `sqlx::Error` if a statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(count >= 3);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_memory_pool().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
