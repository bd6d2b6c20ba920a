//! Authentication route handlers.
//!
//! `register` and `login` are the only routes exempt from the auth gateway;
//! both return a fresh token alongside the user. `me` resolves the token back
//! to its account.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::user::UserProfile;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Registration request body.
///
/// Fields are optional at the wire level so a missing field produces the
/// API's own 400 message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token + user payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Current-user payload.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Treat an absent or empty field as missing.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `POST /api/auth/register`.
///
/// # Errors
///
/// Returns 400 if a field is missing/empty, the email is malformed, or the
/// email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (Some(name), Some(email), Some(password)) = (
        required(body.name),
        required(body.email),
        required(body.password),
    ) else {
        return Err(AppError::Validation(
            "name, email and password are required".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.register(&name, &email, &password).await?;
    let access_token = state.tokens().issue(user.id)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            access_token,
            user: user.profile(),
        }),
    ))
}

/// Handle `POST /api/auth/login`.
///
/// # Errors
///
/// Returns 400 if a field is missing/empty, and 401 with one generic message
/// for unknown email or wrong password alike.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let (Some(email), Some(password)) = (required(body.email), required(body.password)) else {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.login(&email, &password).await?;
    let access_token = state.tokens().issue(user.id)?;

    Ok(Json(SessionResponse {
        access_token,
        user: user.profile(),
    }))
}

/// Handle `GET /api/auth/me`.
///
/// # Errors
///
/// Returns 404 if the resolved id no longer exists.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<MeResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .current_user(user_id)
        .await?
        .ok_or(AppError::NotFound("user not found"))?;

    Ok(Json(MeResponse {
        user: user.profile(),
    }))
}
