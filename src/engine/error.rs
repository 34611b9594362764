use thiserror::Error;

/// Index backing the one-active-ticket-per-(event, user) invariant.
pub(crate) const ACTIVE_TICKET_INDEX: &str = "uq_tickets_event_user_active";

/// Postgres `lock_not_available`, raised when `lock_timeout` expires.
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";

/// Postgres `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Outcome taxonomy for reservation transitions.
///
/// Every failed precondition maps to exactly one variant; nothing is
/// swallowed. Conflict variants are terminal, only [`EngineError::Busy`]
/// is worth retrying.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Event not found")]
    NotFound,

    #[error("You already have a ticket for this event")]
    AlreadyRegistered,

    #[error("Sorry, this event is fully booked")]
    EventFull,

    #[error("Cannot register for past events")]
    EventPast,

    #[error("You cannot buy a ticket for your own event")]
    SelfRegistration,

    #[error("You don't have an active ticket for this event")]
    NoActiveTicket,

    #[error("Maximum participants cannot be less than current participants ({current})")]
    CapacityBelowDemand { requested: i32, current: i64 },

    #[error("You don't have permission to perform this action")]
    Forbidden,

    #[error("The event is busy, please try again")]
    Busy,

    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(PG_LOCK_NOT_AVAILABLE) => return EngineError::Busy,
                Some(PG_UNIQUE_VIOLATION)
                    if db_err.constraint() == Some(ACTIVE_TICKET_INDEX) =>
                {
                    // A concurrent insert for the same (event, user) pair hit
                    // the partial unique index first.
                    return EngineError::AlreadyRegistered;
                }
                _ => {}
            }
        }
        EngineError::Database(err)
    }
}
