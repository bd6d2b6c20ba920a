//! Appointment domain types and store bindings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use agenda_core::{AppointmentId, CalendarDate, ClockTime, UserId};

use crate::db::entities::{FilterPredicates, InsertValues, OwnedRecord, PatchAssignments};

/// A scheduled appointment.
///
/// Appointments may overlap in time; no collision check is performed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: AppointmentId,
    /// Owning user; every query is scoped to it.
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub date: CalendarDate,
    pub time: ClockTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating an appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub title: String,
    /// Defaults to the empty string when the request omits it.
    pub description: String,
    pub date: CalendarDate,
    pub time: ClockTime,
}

/// Field-presence patch: only fields carried here are written.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<CalendarDate>,
    pub time: Option<ClockTime>,
}

/// Equality filters for appointment lists.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date: Option<CalendarDate>,
}

impl OwnedRecord for Appointment {
    type Insert = NewAppointment;
    type Patch = AppointmentPatch;
    type Filter = AppointmentFilter;

    const TABLE: &'static str = "appointments";
    const INSERT_COLUMNS: &'static [&'static str] = &["title", "description", "date", "time"];
    // Ordering is a contract: chronological within the owner's calendar
    const LIST_ORDER: &'static str = "date ASC, time ASC";
}

impl InsertValues for NewAppointment {
    fn push_values(&self, values: &mut Separated<'_, '_, Sqlite, &'static str>) {
        values.push_bind(self.title.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.date.clone());
        values.push_bind(self.time.clone());
    }
}

impl PatchAssignments for AppointmentPatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
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
        if let Some(date) = &self.date {
            assignments.push("date = ");
            assignments.push_bind_unseparated(date.clone());
        }
        if let Some(time) = &self.time {
            assignments.push("time = ");
            assignments.push_bind_unseparated(time.clone());
        }
    }
}

impl FilterPredicates for AppointmentFilter {
    fn push_predicates(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(date) = &self.date {
            qb.push(" AND date = ").push_bind(date.clone());
        }
    }
}
