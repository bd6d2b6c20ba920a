//! Agenda server library.
//!
//! REST API for a personal scheduling application: users register and
//! authenticate, then manage their own appointments and tasks over JSON/HTTP.
//!
//! # Architecture
//!
//! - Axum web framework, one tokio task per request
//! - `SQLite` via a shared `sqlx` connection pool injected through [`state::AppState`]
//! - Stateless Bearer tokens (HS256); identity is resolved per request by the
//!   [`middleware::RequireAuth`] extractor
//! - Every entity query is owner-scoped: a record belonging to another user is
//!   indistinguishable from a nonexistent one
//!
//! The binary in `main.rs` wires configuration, logging, the pool, and the
//! router together; everything else lives here so integration tests can drive
//! the router in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
