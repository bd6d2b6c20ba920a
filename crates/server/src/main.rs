//! Agenda API server binary.
//!
//! Serves the scheduling REST API on the configured port.
//!
//! # Architecture
//!
//! - Axum web framework over tokio
//! - `SQLite` store behind a shared `sqlx` pool
//! - Stateless Bearer-token authentication
//!
//! The schema is NOT initialized automatically on startup. Run it explicitly
//! (idempotent, safe to repeat) via:
//!
//! ```bash
//! cargo run -p agenda-cli -- init-db
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda_server::config::AppConfig;
use agenda_server::state::AppState;
use agenda_server::{db, error, routes};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info level for our
    // crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agenda_server=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration");
    error::install_error_mode(config.environment);

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_path)
        .await
        .expect("Failed to create database pool");
    tracing::info!(path = %config.database_path.display(), "Database pool created");

    // Build application state and router
    let state = AppState::new(config.clone(), pool);
    let app = routes::router(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("agenda server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
