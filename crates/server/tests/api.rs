//! Integration tests driving the full router in-process.
//!
//! Each test builds the real application router over a fresh in-memory
//! `SQLite` store and exercises it with `tower::ServiceExt::oneshot` - no
//! listening socket involved.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

use agenda_server::config::{AppConfig, Environment};
use agenda_server::state::AppState;
use agenda_server::{db, routes};

fn test_config(token_ttl: Duration) -> AppConfig {
    AppConfig {
        database_path: ":memory:".into(),
        host: "127.0.0.1".parse().expect("valid addr"),
        port: 0,
        jwt_secret: SecretString::from("integration-test-signing-key-0123456789"),
        token_ttl,
        cors_origins: vec!["http://localhost:3000".to_string()],
        environment: Environment::Development,
    }
}

async fn test_state(token_ttl: Duration) -> AppState {
    let pool = db::create_memory_pool().await.expect("pool");
    db::init_schema(&pool).await.expect("schema");
    AppState::new(test_config(token_ttl), pool)
}

async fn test_app() -> Router {
    routes::router(test_state(Duration::from_secs(3600)).await)
}

/// Send a request and return `(status, parsed JSON body)`.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json_body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Register a user and return `(token, user)`.
async fn register(app: &Router, name: &str, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let token = body["access_token"].as_str().expect("token").to_string();
    (token, body["user"].clone())
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn register_returns_token_and_sanitized_user() {
    let app = test_app().await;
    let (token, user) = register(&app, "Alice", "alice@example.com", "secret123").await;

    assert!(!token.is_empty());
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@example.com");
    assert!(user.get("password_hash").is_none());
    assert!(user["id"].is_string());
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = test_app().await;
    for body in [
        json!({ "email": "a@example.com", "password": "x" }),
        json!({ "name": "A", "password": "x" }),
        json!({ "name": "A", "email": "a@example.com" }),
        json!({ "name": "", "email": "a@example.com", "password": "x" }),
    ] {
        let (status, response) = send(&app, "POST", "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().expect("error").contains("required"));
    }
}

#[tokio::test]
async fn duplicate_email_is_a_distinct_400() {
    let app = test_app().await;
    register(&app, "Alice", "alice@example.com", "secret123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Other", "email": "alice@example.com", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "this email is already registered");
}

#[tokio::test]
async fn register_then_login_returns_same_user_id() {
    let app = test_app().await;
    let (_, registered) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], registered["id"]);
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn bad_credentials_do_not_reveal_which_part_was_wrong() {
    let app = test_app().await;
    register(&app, "Alice", "alice@example.com", "secret123").await;

    let (wrong_pw_status, wrong_pw) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw["error"], unknown["error"]);
}

#[tokio::test]
async fn me_resolves_the_token() {
    let app = test_app().await;
    let (token, user) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user["id"]);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn entity_routes_reject_unauthenticated_requests() {
    let app = test_app().await;

    // No header at all
    let (status, body) = send(&app, "GET", "/api/appointments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "access token required");

    // Non-Bearer scheme
    let request = Request::builder()
        .method("GET")
        .uri("/api/tasks")
        .header(header::AUTHORIZATION, "Basic abc123")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let (status, body) = send(&app, "GET", "/api/tasks", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn expired_token_gets_its_own_message() {
    // Token lifetime of zero: expired at issuance
    let state = test_state(Duration::ZERO).await;
    let app = routes::router(state.clone());

    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token expired");
}

// =============================================================================
// Appointments
// =============================================================================

#[tokio::test]
async fn appointment_end_to_end_with_ownership() {
    let app = test_app().await;
    let (alice, alice_user) = register(&app, "Alice", "alice@example.com", "secret123").await;

    // Create
    let (status, created) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&alice),
        Some(json!({ "title": "Sync", "date": "2025-08-07", "time": "10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let appointment = &created["appointment"];
    assert_eq!(appointment["user_id"], alice_user["id"]);
    assert_eq!(appointment["description"], "");
    let id = appointment["id"].as_str().expect("id").to_string();

    // Another user's update attempt looks like a missing record
    let (bob, _) = register(&app, "Bob", "bob@example.com", "hunter22").await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{id}"),
        Some(&bob),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Owner deletes
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/appointments/{id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Gone from the owner's list
    let (status, body) = send(
        &app,
        "GET",
        "/api/appointments?date=2025-08-07",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"], json!([]));
}

#[tokio::test]
async fn appointment_validation_errors() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    // Missing required fields
    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&token),
        Some(json!({ "title": "No schedule" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Bad date format
    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&token),
        Some(json!({ "title": "Sync", "date": "07/08/2025", "time": "10:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("YYYY-MM-DD"));

    // Bad time format
    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&token),
        Some(json!({ "title": "Sync", "date": "2025-08-07", "time": "25:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Bad list filter
    let (status, _) = send(
        &app,
        "GET",
        "/api/appointments?date=yesterday",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written
    let (_, body) = send(&app, "GET", "/api/appointments", Some(&token), None).await;
    assert_eq!(body["appointments"], json!([]));
}

#[tokio::test]
async fn appointment_partial_update_semantics() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&token),
        Some(json!({ "title": "Sync", "date": "2025-08-07", "time": "10:00" })),
    )
    .await;
    let appointment = &created["appointment"];
    let id = appointment["id"].as_str().expect("id").to_string();

    // Empty patch: unchanged record, updated_at untouched
    let (status, unchanged) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{id}"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        unchanged["appointment"]["updated_at"],
        appointment["updated_at"]
    );
    assert_eq!(unchanged["appointment"]["title"], "Sync");

    // Single-field patch: only that field changes
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{id}"),
        Some(&token),
        Some(json!({ "time": "11:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["appointment"]["time"], "11:30");
    assert_eq!(updated["appointment"]["title"], "Sync");
    assert_eq!(updated["appointment"]["date"], "2025-08-07");
}

#[tokio::test]
async fn appointments_list_ordered_by_time() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    for (title, time) in [("Late", "15:00"), ("Early", "09:00"), ("Midday", "12:30")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/appointments",
            Some(&token),
            Some(json!({ "title": title, "date": "2025-08-07", "time": time })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    // A different date stays out of the filtered list
    send(
        &app,
        "POST",
        "/api/appointments",
        Some(&token),
        Some(json!({ "title": "Tomorrow", "date": "2025-08-08", "time": "08:00" })),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/appointments?date=2025-08-07",
        Some(&token),
        None,
    )
    .await;
    let titles: Vec<&str> = body["appointments"]
        .as_array()
        .expect("list")
        .iter()
        .map(|a| a["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Early", "Midday", "Late"]);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/appointments/{missing}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A non-UUID id names nothing - same not-found outcome, not a 400
    let (status, _) = send(
        &app,
        "DELETE",
        "/api/appointments/not-a-uuid",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{missing}"),
        Some(&token),
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Tasks
// =============================================================================

#[tokio::test]
async fn task_defaults_and_filtering() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "Water the plants" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["task"]["priority"], "medium");
    assert_eq!(created["task"]["status"], "pending");
    assert_eq!(created["task"]["due_date"], Value::Null);

    // The defaulted task is not a high-priority task
    let (status, body) = send(&app, "GET", "/api/tasks?priority=high", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"], json!([]));

    let (_, body) = send(
        &app,
        "GET",
        "/api/tasks?priority=medium&status=pending",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["tasks"].as_array().expect("list").len(), 1);
}

#[tokio::test]
async fn task_enum_values_are_closed_sets() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    // Create with a value outside the enum: rejected, nothing written
    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "Bad", "priority": "urgent" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("priority"));

    let (_, body) = send(&app, "GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(body["tasks"], json!([]));

    // Update with a bad status: rejected, row unchanged
    let (_, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "Fine" })),
    )
    .await;
    let id = created["task"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(body["tasks"][0]["status"], "pending");

    // Bad filter values are rejected too
    let (status, _) = send(&app, "GET", "/api/tasks?status=bogus", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn task_due_date_can_be_kept_and_cleared() {
    let app = test_app().await;
    let (token, _) = register(&app, "Alice", "alice@example.com", "secret123").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "Renew passport", "due_date": "2025-09-01" })),
    )
    .await;
    assert_eq!(created["task"]["due_date"], "2025-09-01");
    let id = created["task"]["id"].as_str().expect("id").to_string();

    // Omitting due_date keeps it
    let (_, updated) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(updated["task"]["due_date"], "2025-09-01");
    assert_eq!(updated["task"]["status"], "in_progress");

    // Explicit null clears it
    let (_, cleared) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({ "due_date": null })),
    )
    .await;
    assert_eq!(cleared["task"]["due_date"], Value::Null);

    // Bad format on update is rejected
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({ "due_date": "next week" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn task_lists_are_scoped_per_user() {
    let app = test_app().await;
    let (alice, _) = register(&app, "Alice", "alice@example.com", "secret123").await;
    let (bob, _) = register(&app, "Bob", "bob@example.com", "hunter22").await;

    send(
        &app,
        "POST",
        "/api/tasks",
        Some(&alice),
        Some(json!({ "title": "Alice's task" })),
    )
    .await;
    let (_, bobs) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&bob),
        Some(json!({ "title": "Bob's task" })),
    )
    .await;
    let bob_task_id = bobs["task"]["id"].as_str().expect("id").to_string();

    let (_, alice_list) = send(&app, "GET", "/api/tasks", Some(&alice), None).await;
    let titles: Vec<&str> = alice_list["tasks"]
        .as_array()
        .expect("list")
        .iter()
        .map(|t| t["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["Alice's task"]);

    // Alice deleting Bob's task answers exactly like a missing id
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/tasks/{bob_task_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bob_list) = send(&app, "GET", "/api/tasks", Some(&bob), None).await;
    assert_eq!(bob_list["tasks"].as_array().expect("list").len(), 1);
}
