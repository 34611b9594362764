//! Repository for the `users` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{RegisterUser, Role, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, email, password_hash, role, created_at";

/// CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. The caller supplies the already-hashed password.
    ///
    /// A duplicate username or email violates `uq_users_username` /
    /// `uq_users_email` and surfaces as a database error for the handler
    /// to classify.
    pub async fn create(
        pool: &PgPool,
        input: &RegisterUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.username.trim())
            .bind(input.email.trim())
            .bind(password_hash)
            .bind(input.role)
            .fetch_one(pool)
            .await
    }

    /// Change a user's role. Returns the updated row, or `None` if the
    /// user does not exist.
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: Role,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. The FK cascades remove their events and tickets.
    /// Returns `false` if no row matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
