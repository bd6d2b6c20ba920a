//! Appointment route handlers.
//!
//! Every handler runs behind [`RequireAuth`]; the resolved identity scopes
//! all store operations, so another user's appointment answers exactly like a
//! nonexistent one.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agenda_core::{CalendarDate, ClockTime};

use crate::db::entities::OwnedStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::appointment::{
    Appointment, AppointmentFilter, AppointmentPatch, NewAppointment,
};
use crate::routes::MessageResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "appointment not found";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for listing appointments.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

/// Creation request body. Fields are optional at the wire level so missing
/// ones produce the API's own 400 message.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Partial update request body; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub message: &'static str,
    pub appointment: Appointment,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `GET /api/appointments?date=`.
///
/// Results are ordered by `(date, time)` ascending.
///
/// # Errors
///
/// Returns 400 if the date filter is malformed.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppointmentListResponse>> {
    let date = match query.date.filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };

    let store = OwnedStore::<Appointment>::new(state.pool());
    let appointments = store.list(user_id, &AppointmentFilter { date }).await?;

    Ok(Json(AppointmentListResponse { appointments }))
}

/// Handle `POST /api/appointments`.
///
/// # Errors
///
/// Returns 400 if title/date/time are missing or the date/time format is bad.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>)> {
    let (Some(title), Some(date), Some(time)) = (
        body.title.filter(|value| !value.is_empty()),
        body.date.filter(|value| !value.is_empty()),
        body.time.filter(|value| !value.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "title, date and time are required".to_string(),
        ));
    };

    let new_appointment = NewAppointment {
        title,
        description: body.description.unwrap_or_default(),
        date: parse_date(&date)?,
        time: parse_time(&time)?,
    };

    let store = OwnedStore::<Appointment>::new(state.pool());
    let appointment = store.create(user_id, &new_appointment).await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse {
            message: "Appointment created successfully",
            appointment,
        }),
    ))
}

/// Handle `PUT /api/appointments/{id}`.
///
/// Only fields present in the body are changed; `updated_at` is refreshed on
/// any non-empty update.
///
/// # Errors
///
/// Returns 400 on a bad field value, 404 if the appointment doesn't exist or
/// belongs to another user.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>> {
    let id = parse_id(&id)?;

    let mut patch = AppointmentPatch {
        description: body.description,
        ..AppointmentPatch::default()
    };
    if let Some(title) = body.title {
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        patch.title = Some(title);
    }
    if let Some(raw) = body.date {
        patch.date = Some(parse_date(&raw)?);
    }
    if let Some(raw) = body.time {
        patch.time = Some(parse_time(&raw)?);
    }

    let store = OwnedStore::<Appointment>::new(state.pool());
    let appointment = store
        .update(id, user_id, &patch)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    Ok(Json(AppointmentResponse {
        message: "Appointment updated successfully",
        appointment,
    }))
}

/// Handle `DELETE /api/appointments/{id}`.
///
/// # Errors
///
/// Returns 404 if the appointment doesn't exist or belongs to another user.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    let store = OwnedStore::<Appointment>::new(state.pool());
    let deleted = store.delete(id, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully",
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// An unparseable id cannot name any row, so it answers like a missing one -
/// never a 400, preserving the not-found indistinguishability.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND))
}

fn parse_date(raw: &str) -> Result<CalendarDate> {
    CalendarDate::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

fn parse_time(raw: &str) -> Result<ClockTime> {
    ClockTime::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}
