//! Request-level middleware.

pub mod auth;

pub use auth::{AuthRejection, RequireAuth};
