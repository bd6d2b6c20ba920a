//! Agenda Core - Shared types library.
//!
//! This crate provides common types used across all Agenda components:
//! - `server` - REST API server for appointments and tasks
//! - `cli` - Command-line tools for schema initialization and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, calendar
//!   dates/times, and task enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
