//! Ticket purchase and cancellation handlers, thin wrappers over the
//! reservation engine, which owns every precondition.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use sqlx::PgPool;
use uuid::Uuid;

use crate::engine;
use crate::identity::Identity;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success};

/// POST /events/{id}/tickets
pub async fn purchase_ticket(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = engine::purchase(&pool, event_id, identity.user_id).await?;
    Ok(created(
        ticket,
        "Ticket purchased successfully! You are registered for this event.",
    )
    .into_response())
}

/// DELETE /events/{id}/tickets
pub async fn cancel_ticket(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    engine::cancel(&pool, event_id, identity.user_id).await?;
    Ok(empty_success("Ticket cancelled successfully").into_response())
}
