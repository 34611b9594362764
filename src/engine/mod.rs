//! The reservation engine: atomic state transitions for ticket purchase,
//! cancellation, capacity edits, and event deletion.
//!
//! Every mutating operation runs inside a single transaction that first
//! takes a `FOR UPDATE` lock on the event row. That serializes all
//! transitions for one event: seat counts are only ever read under the
//! lock, in the same transaction as the write, so two purchases racing for
//! the last seat admit exactly one winner. Transitions on different events
//! never contend.
//!
//! Lock waits are bounded by a local `lock_timeout`; an expired wait
//! surfaces as [`EngineError::Busy`], which callers may retry.

mod error;

pub use error::EngineError;

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::guard;
use crate::identity::Identity;
use crate::models::{Event, EventInput, Participant, Ticket};

/// Column list for `events` queries.
const EVENT_COLUMNS: &str = "\
    id, organizer_id, title, description, event_date, location, \
    max_participants, created_at, updated_at";

/// Upper bound on how long a transition waits for the event lock.
const LOCK_TIMEOUT: &str = "5s";

/// Lock the event row for the duration of the transaction.
///
/// Bounded by [`LOCK_TIMEOUT`]; an expired wait maps to `Busy` via the
/// `From<sqlx::Error>` classification.
async fn lock_event(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
) -> Result<Event, EngineError> {
    sqlx::query(&format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
        .execute(&mut **tx)
        .await?;

    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Event>(&query)
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(EngineError::NotFound)
}

/// Count of active tickets for an event, read inside the caller's
/// transaction.
async fn count_active(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
) -> Result<i64, EngineError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tickets WHERE event_id = $1 AND status = 'active'",
    )
    .bind(event_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count)
}

/// Transition `(event, user)` from no active ticket to one active ticket.
///
/// Preconditions, checked under the event lock in this order: the event
/// exists, the requester is not its organizer, the event date is in the
/// future, the pair has no active ticket, and at least one seat is free.
/// Returns the new ticket.
pub async fn purchase(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Ticket, EngineError> {
    let mut tx = pool.begin().await?;
    let event = lock_event(&mut tx, event_id).await?;

    if !guard::can_purchase(user_id, event.organizer_id) {
        return Err(EngineError::SelfRegistration);
    }
    if event.event_date <= Utc::now() {
        return Err(EngineError::EventPast);
    }

    let already: bool = sqlx::query_scalar(
        "SELECT EXISTS ( \
             SELECT 1 FROM tickets \
             WHERE event_id = $1 AND user_id = $2 AND status = 'active' \
         )",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    if already {
        return Err(EngineError::AlreadyRegistered);
    }

    let active = count_active(&mut tx, event_id).await?;
    if active >= i64::from(event.max_participants) {
        return Err(EngineError::EventFull);
    }

    let ticket = sqlx::query_as::<_, Ticket>(
        "INSERT INTO tickets (event_id, user_id) VALUES ($1, $2) \
         RETURNING id, event_id, user_id, status, purchase_time",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        event_id = %event_id,
        user_id = %user_id,
        ticket_id = %ticket.id,
        seats_left = i64::from(event.max_participants) - active - 1,
        "Ticket purchased"
    );
    Ok(ticket)
}

/// Transition the caller's active ticket to `cancelled`.
///
/// The ticket row is kept as history; the seat it held becomes free again.
pub async fn cancel(pool: &PgPool, event_id: Uuid, user_id: Uuid) -> Result<(), EngineError> {
    let mut tx = pool.begin().await?;
    lock_event(&mut tx, event_id).await?;

    let updated = sqlx::query(
        "UPDATE tickets SET status = 'cancelled' \
         WHERE event_id = $1 AND user_id = $2 AND status = 'active'",
    )
    .bind(event_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(EngineError::NoActiveTicket);
    }

    tx.commit().await?;

    tracing::info!(event_id = %event_id, user_id = %user_id, "Ticket cancelled");
    Ok(())
}

/// Remaining seats for an event: `max_participants` minus active tickets.
///
/// A single statement, so the count and the capacity come from one
/// consistent snapshot.
pub async fn available_seats(pool: &PgPool, event_id: Uuid) -> Result<i64, EngineError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT e.max_participants - COUNT(t.id) \
         FROM events e \
         LEFT JOIN tickets t ON t.event_id = e.id AND t.status = 'active' \
         WHERE e.id = $1 \
         GROUP BY e.id, e.max_participants",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?
    .ok_or(EngineError::NotFound)
}

/// Lower or raise an event's capacity. Owner or admin only.
///
/// The new maximum must cover the tickets already sold; otherwise the edit
/// fails with the current count so the caller can display the conflict.
pub async fn update_capacity(
    pool: &PgPool,
    event_id: Uuid,
    new_max: i32,
    actor: &Identity,
) -> Result<(), EngineError> {
    let mut tx = pool.begin().await?;
    let event = lock_event(&mut tx, event_id).await?;

    if !guard::can_edit(actor, event.organizer_id) {
        return Err(EngineError::Forbidden);
    }
    check_capacity_floor(&mut tx, event_id, new_max).await?;

    sqlx::query("UPDATE events SET max_participants = $2, updated_at = NOW() WHERE id = $1")
        .bind(event_id)
        .bind(new_max)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        event_id = %event_id,
        actor_id = %actor.user_id,
        new_max = new_max,
        "Event capacity updated"
    );
    Ok(())
}

/// Replace an event's descriptive fields and capacity in one transition.
/// Owner or admin only; applies the same capacity floor as
/// [`update_capacity`].
pub async fn update_event(
    pool: &PgPool,
    event_id: Uuid,
    input: &EventInput,
    actor: &Identity,
) -> Result<Event, EngineError> {
    let mut tx = pool.begin().await?;
    let event = lock_event(&mut tx, event_id).await?;

    if !guard::can_edit(actor, event.organizer_id) {
        return Err(EngineError::Forbidden);
    }
    check_capacity_floor(&mut tx, event_id, input.max_participants).await?;

    let query = format!(
        "UPDATE events \
         SET title = $2, description = $3, event_date = $4, location = $5, \
             max_participants = $6, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {EVENT_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Event>(&query)
        .bind(event_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.event_date)
        .bind(&input.location)
        .bind(input.max_participants)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(event_id = %event_id, actor_id = %actor.user_id, "Event updated");
    Ok(updated)
}

/// Delete an event and, via the FK cascade, every ticket that references
/// it, in one transaction with no intermediate state. Owner or admin only.
pub async fn delete_event(
    pool: &PgPool,
    event_id: Uuid,
    actor: &Identity,
) -> Result<(), EngineError> {
    let mut tx = pool.begin().await?;
    let event = lock_event(&mut tx, event_id).await?;

    if !guard::can_delete(actor, event.organizer_id) {
        return Err(EngineError::Forbidden);
    }

    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(event_id = %event_id, actor_id = %actor.user_id, "Event deleted");
    Ok(())
}

/// Active ticket holders for an event, oldest purchase first. Owner or
/// admin only.
pub async fn list_participants(
    pool: &PgPool,
    event_id: Uuid,
    actor: &Identity,
) -> Result<Vec<Participant>, EngineError> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let event = sqlx::query_as::<_, Event>(&query)
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or(EngineError::NotFound)?;

    if !guard::can_view_participants(actor, event.organizer_id) {
        return Err(EngineError::Forbidden);
    }

    let participants = sqlx::query_as::<_, Participant>(
        "SELECT t.user_id, u.username, u.email, t.purchase_time \
         FROM tickets t \
         JOIN users u ON u.id = t.user_id \
         WHERE t.event_id = $1 AND t.status = 'active' \
         ORDER BY t.purchase_time ASC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(participants)
}

/// Reject a capacity below the current active-ticket count. Runs inside
/// the caller's transaction, under the event lock.
async fn check_capacity_floor(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
    new_max: i32,
) -> Result<(), EngineError> {
    let current = count_active(tx, event_id).await?;
    if i64::from(new_max) < current {
        return Err(EngineError::CapacityBelowDemand {
            requested: new_max,
            current,
        });
    }
    Ok(())
}
