//! Domain types for users, appointments, and tasks.

pub mod appointment;
pub mod task;
pub mod user;

pub use appointment::{Appointment, AppointmentFilter, AppointmentPatch, NewAppointment};
pub use task::{NewTask, Task, TaskFilter, TaskPatch};
pub use user::{User, UserProfile};
