//! Read-only listing and search, consumed by presentation collaborators.
//!
//! No locks here: each listing is a single statement, so it reads one
//! consistent snapshot. Ordering is stable: events by date ascending,
//! users by registration time descending.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::EventSummary;
use crate::models::user::User;

/// Shape a free-text term into a `LIKE` pattern, or pass through the
/// match-all `NULL`.
fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

/// Events joined with organizer name and active-ticket count, optionally
/// filtered by a free-text match on title, description, or location.
pub async fn list_events(
    pool: &PgPool,
    search: Option<&str>,
) -> Result<Vec<EventSummary>, sqlx::Error> {
    sqlx::query_as::<_, EventSummary>(
        "SELECT e.id, e.organizer_id, u.username AS organizer_name, \
                e.title, e.description, e.event_date, e.location, \
                e.max_participants, \
                (SELECT COUNT(*) FROM tickets t \
                 WHERE t.event_id = e.id AND t.status = 'active') AS active_tickets \
         FROM events e \
         JOIN users u ON u.id = e.organizer_id \
         WHERE $1::TEXT IS NULL \
            OR e.title ILIKE $1 OR e.description ILIKE $1 OR e.location ILIKE $1 \
         ORDER BY e.event_date ASC",
    )
    .bind(like_pattern(search))
    .fetch_all(pool)
    .await
}

/// One event with organizer name and active-ticket count.
pub async fn event_details(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Option<EventSummary>, sqlx::Error> {
    sqlx::query_as::<_, EventSummary>(
        "SELECT e.id, e.organizer_id, u.username AS organizer_name, \
                e.title, e.description, e.event_date, e.location, \
                e.max_participants, \
                (SELECT COUNT(*) FROM tickets t \
                 WHERE t.event_id = e.id AND t.status = 'active') AS active_tickets \
         FROM events e \
         JOIN users u ON u.id = e.organizer_id \
         WHERE e.id = $1",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await
}

/// Users filtered by a free-text match on username or email.
pub async fn list_users(pool: &PgPool, search: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, role, created_at \
         FROM users \
         WHERE $1::TEXT IS NULL OR username ILIKE $1 OR email ILIKE $1 \
         ORDER BY created_at DESC",
    )
    .bind(like_pattern(search))
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern(Some("rust")), Some("%rust%".to_string()));
    }

    #[test]
    fn test_blank_search_matches_all() {
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("   ")), None);
    }
}
