//! Authentication service.
//!
//! Registration, credential verification, and current-user lookup over the
//! user repository. Passwords are hashed with Argon2id before they reach
//! storage and verified through the password-hash verifier - never a plain
//! string comparison.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use agenda_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// The caller has already checked the fields are present and non-empty;
    /// this validates the email structure, hashes the password, and persists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email doesn't parse.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` whether the email is unknown,
    /// the email is malformed, or the password is wrong - indistinguishable
    /// by design.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed email cannot belong to an account; same generic error
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Look up the user behind a resolved identity.
    ///
    /// Returns `None` if the id no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn current_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(id).await?)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, init_schema};

    async fn test_pool() -> SqlitePool {
        let pool = create_memory_pool().await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let registered = auth
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();
        let logged_in = auth.login("alice@example.com", "secret123").await.unwrap();

        assert_eq!(logged_in.id, registered.id);
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let user = auth
            .register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        assert_ne!(user.password_hash, "secret123");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();

        let wrong_password = auth.login("alice@example.com", "wrong").await;
        let unknown_email = auth.login("nobody@example.com", "secret123").await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_email_taken() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Alice", "alice@example.com", "secret123")
            .await
            .unwrap();
        let again = auth
            .register("Also Alice", "alice@example.com", "different")
            .await;

        assert!(matches!(again, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_at_registration() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let result = auth.register("Alice", "not-an-email", "secret123").await;
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_current_user_missing_id() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        assert!(
            auth.current_user(UserId::generate())
                .await
                .unwrap()
                .is_none()
        );
    }
}
