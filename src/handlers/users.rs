//! Registration and admin user management handlers.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::guard;
use crate::identity::Identity;
use crate::models::user::{RegisterUser, UpdateUserRole, UserListQuery};
use crate::query;
use crate::store::UserRepo;
use crate::utils::error::AppError;
use crate::utils::password::hash_password;
use crate::utils::response::{created, empty_success, success};

/// Postgres `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Map a duplicate username/email insert to a conflict the caller can act
/// on; everything else stays a database error.
fn classify_user_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
            && db_err
                .constraint()
                .is_some_and(|c| c.starts_with("uq_users"))
        {
            return AppError::Conflict("Username or email is already taken".to_string());
        }
    }
    AppError::DatabaseError(err)
}

/// POST /users. Open registration, as participant or organizer.
pub async fn register_user(
    State(pool): State<PgPool>,
    Json(input): Json<RegisterUser>,
) -> Result<Response, AppError> {
    input.validate().map_err(AppError::ValidationError)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(&pool, &input, &password_hash)
        .await
        .map_err(classify_user_insert_error)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(created(user, "Registration successful").into_response())
}

/// GET /users?search=. Admin only.
pub async fn list_users(
    identity: Identity,
    State(pool): State<PgPool>,
    Query(params): Query<UserListQuery>,
) -> Result<Response, AppError> {
    if !guard::can_manage_users(&identity) {
        return Err(AppError::Forbidden(
            "Only admins can manage users".to_string(),
        ));
    }

    let users = query::list_users(&pool, params.search.as_deref()).await?;
    Ok(success(users, "Users retrieved").into_response())
}

/// PUT /users/{id}/role. Admin only.
pub async fn update_user_role(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserRole>,
) -> Result<Response, AppError> {
    if !guard::can_manage_users(&identity) {
        return Err(AppError::Forbidden(
            "Only admins can manage users".to_string(),
        ));
    }

    let user = UserRepo::update_role(&pool, user_id, input.role)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, role = %user.role, actor_id = %identity.user_id, "User role updated");
    Ok(success(user, "User role updated successfully").into_response())
}

/// DELETE /users/{id}. Admin only, never yourself. Cascades to the
/// user's events and tickets.
pub async fn delete_user(
    identity: Identity,
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !guard::can_manage_users(&identity) {
        return Err(AppError::Forbidden(
            "Only admins can manage users".to_string(),
        ));
    }
    if user_id == identity.user_id {
        return Err(AppError::Conflict(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !UserRepo::delete(&pool, user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %user_id, actor_id = %identity.user_id, "User deleted");
    Ok(empty_success("User deleted successfully").into_response())
}
