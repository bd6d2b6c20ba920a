//! Task route handlers.
//!
//! Same owner-scoped discipline as appointments, plus the closed
//! priority/status enums and the doubly-optional due date: a request that
//! omits `due_date` keeps the stored value, an explicit `null` clears it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use agenda_core::{CalendarDate, TaskPriority, TaskStatus};

use crate::db::entities::OwnedStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::task::{NewTask, Task, TaskFilter, TaskPatch};
use crate::routes::MessageResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "task not found";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Creation request body. Omitted `priority`/`status` take their declared
/// defaults (`medium`/`pending`).
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update request body.
///
/// `due_date` distinguishes "absent" (keep) from "explicitly null" (clear)
/// via the double-`Option` deserializer.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: &'static str,
    pub task: Task,
}

/// Maps a present-but-null field to `Some(None)` while leaving an absent
/// field as `None` (with `#[serde(default)]`).
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `GET /api/tasks?status=&priority=`.
///
/// Results are ordered newest first.
///
/// # Errors
///
/// Returns 400 if a filter value is outside its enum.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<TaskListResponse>> {
    let filter = TaskFilter {
        status: match query.status.filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(parse_status(&raw)?),
            None => None,
        },
        priority: match query.priority.filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(parse_priority(&raw)?),
            None => None,
        },
    };

    let store = OwnedStore::<Task>::new(state.pool());
    let tasks = store.list(user_id, &filter).await?;

    Ok(Json(TaskListResponse { tasks }))
}

/// Handle `POST /api/tasks`.
///
/// # Errors
///
/// Returns 400 if the title is missing, an enum value is unknown, or the due
/// date format is bad.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let Some(title) = body.title.filter(|value| !value.is_empty()) else {
        return Err(AppError::Validation("title is required".to_string()));
    };

    let priority = match body.priority.filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_priority(&raw)?,
        None => TaskPriority::default(),
    };
    let status = match body.status.filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_status(&raw)?,
        None => TaskStatus::default(),
    };
    let due_date = match body.due_date.filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };

    let new_task = NewTask {
        title,
        description: body.description.unwrap_or_default(),
        priority,
        status,
        due_date,
    };

    let store = OwnedStore::<Task>::new(state.pool());
    let task = store.create(user_id, &new_task).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

/// Handle `PUT /api/tasks/{id}`.
///
/// Only fields present in the body are changed. Enum and format checks run
/// before anything touches storage.
///
/// # Errors
///
/// Returns 400 on a bad field value, 404 if the task doesn't exist or
/// belongs to another user.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    let id = parse_id(&id)?;

    let mut patch = TaskPatch {
        description: body.description,
        ..TaskPatch::default()
    };
    if let Some(title) = body.title {
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        patch.title = Some(title);
    }
    if let Some(raw) = body.priority {
        patch.priority = Some(parse_priority(&raw)?);
    }
    if let Some(raw) = body.status {
        patch.status = Some(parse_status(&raw)?);
    }
    match body.due_date {
        None => {}
        Some(None) => patch.due_date = Some(None),
        Some(Some(raw)) if raw.is_empty() => patch.due_date = Some(None),
        Some(Some(raw)) => patch.due_date = Some(Some(parse_date(&raw)?)),
    }

    let store = OwnedStore::<Task>::new(state.pool());
    let task = store
        .update(id, user_id, &patch)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully",
        task,
    }))
}

/// Handle `DELETE /api/tasks/{id}`.
///
/// # Errors
///
/// Returns 404 if the task doesn't exist or belongs to another user.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    let store = OwnedStore::<Task>::new(state.pool());
    let deleted = store.delete(id, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// An unparseable id cannot name any row, so it answers like a missing one.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND))
}

fn parse_date(raw: &str) -> Result<CalendarDate> {
    CalendarDate::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

fn parse_priority(raw: &str) -> Result<TaskPriority> {
    raw.parse()
        .map_err(|e: agenda_core::ParsePriorityError| AppError::Validation(e.to_string()))
}

fn parse_status(raw: &str) -> Result<TaskStatus> {
    raw.parse()
        .map_err(|e: agenda_core::ParseStatusError| AppError::Validation(e.to_string()))
}
