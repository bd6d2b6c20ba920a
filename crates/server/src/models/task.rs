//! Task domain types and store bindings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use agenda_core::{CalendarDate, TaskId, TaskPriority, TaskStatus, UserId};

use crate::db::entities::{FilterPredicates, InsertValues, OwnedRecord, PatchAssignments};

/// A task on the owner's list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: TaskId,
    /// Owning user; every query is scoped to it.
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<CalendarDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a task. Enum defaults (`medium`/`pending`)
/// are applied before a value of this type exists.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<CalendarDate>,
}

/// Field-presence patch: only fields carried here are written.
///
/// `due_date` is doubly optional: the outer level is presence (absent keeps
/// the stored value), the inner level is the new value (`None` clears it).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<CalendarDate>>,
}

/// Equality filters for task lists.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl OwnedRecord for Task {
    type Insert = NewTask;
    type Patch = TaskPatch;
    type Filter = TaskFilter;

    const TABLE: &'static str = "tasks";
    const INSERT_COLUMNS: &'static [&'static str] =
        &["title", "description", "priority", "status", "due_date"];
    // Ordering is a contract: newest first
    const LIST_ORDER: &'static str = "created_at DESC";
}

impl InsertValues for NewTask {
    fn push_values(&self, values: &mut Separated<'_, '_, Sqlite, &'static str>) {
        values.push_bind(self.title.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.priority);
        values.push_bind(self.status);
        values.push_bind(self.due_date.clone());
    }
}

impl PatchAssignments for TaskPatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }

    fn push_assignments(&self, assignments: &mut Separated<'_, '_, Sqlite, &'static str>) {
        if let Some(title) = &self.title {
            assignments.push("title = ");
            assignments.push_bind_unseparated(title.clone());
        }
        if let Some(description) = &self.description {
            assignments.push("description = ");
            assignments.push_bind_unseparated(description.clone());
        }
        if let Some(priority) = self.priority {
            assignments.push("priority = ");
            assignments.push_bind_unseparated(priority);
        }
        if let Some(status) = self.status {
            assignments.push("status = ");
            assignments.push_bind_unseparated(status);
        }
        if let Some(due_date) = &self.due_date {
            // Binding None writes NULL, clearing the due date
            assignments.push("due_date = ");
            assignments.push_bind_unseparated(due_date.clone());
        }
    }
}

impl FilterPredicates for TaskFilter {
    fn push_predicates(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(status) = self.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = self.priority {
            qb.push(" AND priority = ").push_bind(priority);
        }
    }
}
