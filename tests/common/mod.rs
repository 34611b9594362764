//! Shared harness for integration tests: seed helpers, app construction,
//! and request plumbing.

// Each test binary compiles this module; not every binary uses every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use turnstile_server::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use turnstile_server::models::Role;
use turnstile_server::routes::create_routes;

/// Build the full application router, the same construction `main` uses.
pub fn build_test_app(pool: PgPool) -> Router {
    create_routes(pool)
}

/// A date comfortably in the future.
pub fn future_date() -> DateTime<Utc> {
    Utc::now() + Duration::days(30)
}

/// A date already behind us.
pub fn past_date() -> DateTime<Utc> {
    Utc::now() - Duration::days(1)
}

/// Insert a user directly; registration is exercised separately.
pub async fn seed_user(pool: &PgPool, username: &str, role: Role) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role) \
         VALUES ($1, $2, 'not-a-real-hash', $3) \
         RETURNING id",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("failed to seed user")
}

/// Insert an event owned by `organizer_id`.
pub async fn seed_event(
    pool: &PgPool,
    organizer_id: Uuid,
    max_participants: i32,
    event_date: DateTime<Utc>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO events \
             (organizer_id, title, description, event_date, location, max_participants) \
         VALUES ($1, 'Seeded event', 'An event inserted by the test harness', $2, 'Test hall', $3) \
         RETURNING id",
    )
    .bind(organizer_id)
    .bind(event_date)
    .bind(max_participants)
    .fetch_one(pool)
    .await
    .expect("failed to seed event")
}

/// Active tickets for an event.
pub async fn active_ticket_count(pool: &PgPool, event_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1 AND status = 'active'")
        .bind(event_id)
        .fetch_one(pool)
        .await
        .expect("failed to count active tickets")
}

/// All tickets for an event, cancelled included.
pub async fn total_ticket_count(pool: &PgPool, event_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(pool)
        .await
        .expect("failed to count tickets")
}

/// Send a request, optionally carrying the verified-identity headers and a
/// JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    identity: Option<(Uuid, Role)>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some((user_id, role)) = identity {
        builder = builder
            .header(USER_ID_HEADER, user_id.to_string())
            .header(USER_ROLE_HEADER, role.as_str());
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    app.oneshot(request).await.expect("request failed")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not valid JSON")
}
