use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Upper bound on event capacity, matching the creation form limit.
pub const MAX_CAPACITY: i32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event row joined with its organizer's username and the number of
/// active tickets, as returned by the listing queries.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSummary {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub active_tickets: i64,
}

/// Payload for `POST /events` and `PUT /events/{id}`.
#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
}

impl EventInput {
    /// Field-level validation; returns the first failure.
    ///
    /// The capacity floor against already-sold tickets is not checked here,
    /// it belongs to the engine where it can run under the event lock.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().len() < 5 {
            return Err("Event title must be at least 5 characters".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Event description is required".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("Event location is required".to_string());
        }
        if self.max_participants < 1 {
            return Err("Maximum participants must be at least 1".to_string());
        }
        if self.max_participants > MAX_CAPACITY {
            return Err(format!(
                "Maximum participants cannot exceed {MAX_CAPACITY}"
            ));
        }
        Ok(())
    }
}

/// Query parameters for `GET /events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventListQuery {
    /// Free-text match on title, description, or location.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid() -> EventInput {
        EventInput {
            title: "Rust meetup".to_string(),
            description: "Monthly meetup".to_string(),
            event_date: Utc::now() + Duration::days(7),
            location: "Community hall".to_string(),
            max_participants: 50,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_title_rejected() {
        let mut input = valid();
        input.title = "Rust".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_capacity_bounds_enforced() {
        let mut input = valid();
        input.max_participants = 0;
        assert!(input.validate().is_err());
        input.max_participants = MAX_CAPACITY + 1;
        assert!(input.validate().is_err());
        input.max_participants = MAX_CAPACITY;
        assert!(input.validate().is_ok());
    }
}
