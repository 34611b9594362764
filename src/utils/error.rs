use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::engine::EngineError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Engine(e) => match e {
                EngineError::NotFound => StatusCode::NOT_FOUND,
                EngineError::Forbidden => StatusCode::FORBIDDEN,
                EngineError::AlreadyRegistered
                | EngineError::EventFull
                | EngineError::EventPast
                | EngineError::SelfRegistration
                | EngineError::NoActiveTicket
                | EngineError::CapacityBelowDemand { .. } => StatusCode::CONFLICT,
                EngineError::Busy => StatusCode::SERVICE_UNAVAILABLE,
                EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Engine(e) => match e {
                EngineError::NotFound => "NOT_FOUND",
                EngineError::AlreadyRegistered => "ALREADY_REGISTERED",
                EngineError::EventFull => "EVENT_FULL",
                EngineError::EventPast => "EVENT_PAST",
                EngineError::SelfRegistration => "SELF_REGISTRATION",
                EngineError::NoActiveTicket => "NO_ACTIVE_TICKET",
                EngineError::CapacityBelowDemand { .. } => "CAPACITY_BELOW_DEMAND",
                EngineError::Forbidden => "FORBIDDEN",
                EngineError::Busy => "BUSY",
                EngineError::Database(_) => "DATABASE_ERROR",
            },
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::Engine(EngineError::Database(e)) => {
                error!(error = ?e, "Database error inside engine transition");
            }
            AppError::Engine(e) => {
                // Business-rule rejections are expected traffic.
                tracing::debug!(error = %e, code = self.code(), "Engine rejection");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::Engine(EngineError::Database(_)) | AppError::DatabaseError(_) => {
                "A database error occurred".to_string()
            }
            AppError::Engine(e) => e.to_string(),
        };

        // Conflict payloads carry enough context for the caller to render
        // the collision; everything else stays message-only.
        let details: Option<Value> = match &self {
            AppError::Engine(EngineError::CapacityBelowDemand { requested, current }) => {
                Some(json!({
                    "requested": requested,
                    "current_participants": current,
                }))
            }
            _ => None,
        };

        error_response(code, public_message, details, status)
    }
}
