//! Repository for the `events` table.
//!
//! Mutations that must hold the capacity invariant (capacity edits,
//! deletion) live in the engine, not here.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{Event, EventInput};

/// Column list for `events` queries.
const COLUMNS: &str = "\
    id, organizer_id, title, description, event_date, location, \
    max_participants, created_at, updated_at";

/// Creation and lookup for events.
pub struct EventRepo;

impl EventRepo {
    pub async fn create(
        pool: &PgPool,
        organizer_id: Uuid,
        input: &EventInput,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events \
                 (organizer_id, title, description, event_date, location, max_participants) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .bind(input.title.trim())
            .bind(input.description.trim())
            .bind(input.event_date)
            .bind(input.location.trim())
            .bind(input.max_participants)
            .fetch_one(pool)
            .await
    }
}
