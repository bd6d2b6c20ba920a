//! Core types for Agenda.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod datetime;
pub mod email;
pub mod id;
pub mod task;

pub use datetime::{CalendarDate, ClockTime, DateFormatError, TimeFormatError};
pub use email::{Email, EmailError};
pub use id::*;
pub use task::{ParsePriorityError, ParseStatusError, TaskPriority, TaskStatus};
