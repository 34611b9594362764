use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ticket states, mirrored by the `ticket_status` Postgres enum.
///
/// Cancelled tickets are kept as history; only `Active` counts against
/// event capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: TicketStatus,
    pub purchase_time: DateTime<Utc>,
}

/// An active ticket joined with its holder, as shown to organizers.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub purchase_time: DateTime<Utc>,
}
