//! Event lifecycle and listing handlers.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::engine;
use crate::guard;
use crate::identity::Identity;
use crate::models::event::{EventInput, EventListQuery, EventSummary};
use crate::query;
use crate::store::EventRepo;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
struct EventDetail {
    #[serde(flatten)]
    event: EventSummary,
    available_seats: i64,
}

/// GET /events?search=
pub async fn list_events(
    _identity: Identity,
    State(pool): State<PgPool>,
    Query(params): Query<EventListQuery>,
) -> Result<Response, AppError> {
    let events = query::list_events(&pool, params.search.as_deref()).await?;
    Ok(success(events, "Events retrieved").into_response())
}

/// GET /events/{id}
pub async fn get_event(
    _identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = query::event_details(&pool, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let available_seats = i64::from(event.max_participants) - event.active_tickets;
    let detail = EventDetail {
        event,
        available_seats,
    };
    Ok(success(detail, "Event retrieved").into_response())
}

/// POST /events. Organizers and admins only.
pub async fn create_event(
    identity: Identity,
    State(pool): State<PgPool>,
    Json(input): Json<EventInput>,
) -> Result<Response, AppError> {
    if !guard::can_create_event(&identity) {
        return Err(AppError::Forbidden(
            "Only organizers and admins can create events".to_string(),
        ));
    }
    input.validate().map_err(AppError::ValidationError)?;
    if input.event_date <= Utc::now() {
        return Err(AppError::ValidationError(
            "Event date must be in the future".to_string(),
        ));
    }

    let event = EventRepo::create(&pool, identity.user_id, &input).await?;

    tracing::info!(event_id = %event.id, organizer_id = %identity.user_id, "Event created");
    Ok(created(event, "Event created successfully!").into_response())
}

/// PUT /events/{id}. Owner or admin; the capacity floor is enforced by
/// the engine under the event lock.
pub async fn update_event(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
    Json(input): Json<EventInput>,
) -> Result<Response, AppError> {
    input.validate().map_err(AppError::ValidationError)?;

    let event = engine::update_event(&pool, event_id, &input, &identity).await?;
    Ok(success(event, "Event updated successfully!").into_response())
}

/// DELETE /events/{id}. Owner or admin; tickets go with the event.
pub async fn delete_event(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    engine::delete_event(&pool, event_id, &identity).await?;
    Ok(empty_success("Event deleted successfully").into_response())
}

/// GET /events/{id}/seats
pub async fn available_seats(
    _identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let seats = engine::available_seats(&pool, event_id).await?;
    Ok(success(json!({ "available_seats": seats }), "Seats retrieved").into_response())
}

/// GET /events/{id}/participants. Owner or admin only.
pub async fn list_participants(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let participants = engine::list_participants(&pool, event_id, &identity).await?;
    Ok(success(participants, "Participants retrieved").into_response())
}
