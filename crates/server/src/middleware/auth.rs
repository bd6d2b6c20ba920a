//! Authentication middleware and extractors.
//!
//! Provides the extractor that gates every entity route: it pulls the Bearer
//! token from the `Authorization` header, verifies it, and hands the resolved
//! identity to the handler. Requests without a valid token are rejected with
//! 401 before any entity access happens.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use agenda_core::UserId;

use crate::error::ErrorBody;
use crate::services::token::TokenError;
use crate::state::AppState;

/// Extractor that requires a verified identity token.
///
/// The wrapped [`UserId`] is the resolved identity: every store operation the
/// handler performs is scoped to it.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct RequireAuth(pub UserId);

/// Error returned when a request carries no usable token.
#[derive(Debug)]
pub enum AuthRejection {
    /// No `Authorization` header, or not a Bearer scheme.
    MissingToken,
    /// The token failed verification.
    Token(TokenError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // Expired and invalid tokens carry distinct messages but the same
        // status; the distinction is for observability, not client branching
        let message = match &self {
            Self::MissingToken => "access token required".to_string(),
            Self::Token(err) => err.to_string(),
        };

        (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(message))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthRejection::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthRejection::MissingToken)?;

        let user_id = state
            .tokens()
            .verify(token)
            .map_err(AuthRejection::Token)?;

        Ok(Self(user_id))
    }
}
