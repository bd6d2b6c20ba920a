//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use agenda_core::{Email, UserId};

/// A registered user.
///
/// Created once at registration and immutable thereafter. Carries the
/// password hash for credential verification - never serialized as-is; use
/// [`User::profile`] for anything user-facing.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across accounts (case-sensitive as stored).
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user-facing shape of this account, without the password hash.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// User payload embedded in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}
