//! Verified caller identity.
//!
//! Authentication lives upstream (session handling, CSRF, credential
//! checks); by the time a request reaches this service a trusted proxy has
//! resolved it to a user id and role and forwarded them as headers. The
//! extractor only parses that pair; it never consults the database.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::models::Role;
use crate::utils::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The `(user_id, role)` pair every guard and engine call consumes.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Uuid>().ok())
            .ok_or_else(|| {
                AppError::AuthError(format!("Missing or invalid {USER_ID_HEADER} header"))
            })?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Role>().ok())
            .ok_or_else(|| {
                AppError::AuthError(format!("Missing or invalid {USER_ROLE_HEADER} header"))
            })?;

        Ok(Identity { user_id, role })
    }
}
