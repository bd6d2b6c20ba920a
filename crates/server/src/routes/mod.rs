//! HTTP route handlers for the Agenda API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health            - Liveness check (no auth)
//!
//! # Auth
//! POST   /api/auth/register     - Create an account, returns token + user
//! POST   /api/auth/login        - Exchange credentials for token + user
//! GET    /api/auth/me           - Current identity (requires auth)
//!
//! # Appointments (all require auth)
//! GET    /api/appointments      - List, optional ?date=YYYY-MM-DD filter
//! POST   /api/appointments      - Create
//! PUT    /api/appointments/{id} - Partial update
//! DELETE /api/appointments/{id} - Delete
//!
//! # Tasks (all require auth)
//! GET    /api/tasks             - List, optional ?status=&priority= filters
//! POST   /api/tasks             - Create
//! PUT    /api/tasks/{id}        - Partial update
//! DELETE /api/tasks/{id}        - Delete
//! ```
//!
//! Authenticated routes expect `Authorization: Bearer <token>`. A 401 means
//! the client should discard its token and return to the unauthenticated
//! state.

pub mod appointments;
pub mod auth;
pub mod tasks;

use axum::http::{HeaderValue, Method, header};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::state::AppState;

/// Response carrying only a confirmation message (deletes).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes())
        .nest("/api/appointments", appointment_routes())
        .nest("/api/tasks", task_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Create the auth routes router.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the appointment routes router.
fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::list).post(appointments::create))
        .route(
            "/{id}",
            put(appointments::update).delete(appointments::remove),
        )
}

/// Create the task routes router.
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/{id}", put(tasks::update).delete(tasks::remove))
}

/// Build the CORS layer from the configured allowed origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    environment: &'static str,
}

/// Liveness health check endpoint.
///
/// Returns immediately if the server is running. Does not check dependencies.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        environment: state.config().environment.as_str(),
    })
}
