//! Signed, time-limited identity tokens.
//!
//! Tokens are stateless: they assert a user id until natural expiry and are
//! verified without any server-side lookup. There is no revocation list -
//! logout is purely a client-side discard, so a token stays valid after
//! "logout" until it expires. That is a deliberate design limitation.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agenda_core::UserId;

/// Token verification/signing failures.
///
/// `Expired` and `Invalid` map to distinct user-facing messages but the same
/// 401 status - the distinction exists for observability, not for client
/// branching.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// Malformed token, bad signature, or claims that don't parse.
    #[error("invalid token")]
    Invalid,

    /// Signing failed while issuing a token.
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by an issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The asserted user id.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Issues and verifies HS256 identity tokens.
///
/// The signing key is process-wide configuration; one instance lives in the
/// application state.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the configured signing secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would keep freshly-expired
        // tokens alive
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    /// Issue a signed token asserting `user_id`, expiring after the
    /// configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return the user id it asserts.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the token's expiry has passed, and
    /// `TokenError::Invalid` for anything else (bad signature, malformed
    /// token, unparseable subject).
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(ttl_secs: u64) -> TokenService {
        TokenService::new(
            &SecretString::from("test-signing-key-that-is-long-enough"),
            Duration::from_secs(ttl_secs),
        )
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = service(3600);
        let user_id = UserId::generate();

        let token = tokens.issue(user_id).unwrap();
        let verified = tokens.verify(&token).unwrap();
        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_expired_token() {
        let tokens = service(0);
        let token = tokens.issue(UserId::generate()).unwrap();

        // ttl of zero expires at issuance
        std::thread::sleep(Duration::from_millis(1100));
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let tokens = service(3600);
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let issuer = service(3600);
        let token = issuer.issue(UserId::generate()).unwrap();

        let verifier = TokenService::new(
            &SecretString::from("a-completely-different-signing-key"),
            Duration::from_secs(3600),
        );
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_subject_is_invalid() {
        let tokens = service(3600);
        let token = tokens.issue(UserId::generate()).unwrap();

        // Flip a payload character; signature check must fail
        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid)));
    }
}
