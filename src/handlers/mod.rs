pub mod events;
pub mod tickets;
pub mod users;

use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "turnstile-api",
    };

    success(payload, "Health check successful").into_response()
}
