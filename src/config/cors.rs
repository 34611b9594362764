//! CORS policy for browser front-ends.
//!
//! The allow-list comes from `CORS_ALLOWED_ORIGINS` (comma-separated); the
//! identity headers must be allowed or the browser strips them from
//! preflighted requests.

use std::env;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::identity::{USER_ID_HEADER, USER_ROLE_HEADER};

const DEFAULT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86400);

pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            // identity pair forwarded by the auth proxy
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

fn allowed_origins() -> AllowOrigin {
    let configured = env::var("CORS_ALLOWED_ORIGINS").ok();
    let raw = configured
        .as_deref()
        .map(|s| s.split(',').collect::<Vec<_>>())
        .unwrap_or_else(|| DEFAULT_ORIGINS.to_vec());

    let origins: Vec<HeaderValue> = raw
        .into_iter()
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: skipping invalid origin");
                None
            }
        })
        .collect();

    tracing::info!(count = origins.len(), "CORS: origins configured");
    AllowOrigin::list(origins)
}
