use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User roles, mirrored by the `user_role` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Organizer,
    Participant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Organizer => "organizer",
            Role::Participant => "participant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "organizer" => Ok(Role::Organizer),
            "participant" => Ok(Role::Participant),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /users`. Admin roles are never self-assigned.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterUser {
    /// Field-level validation; returns the first failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().len() < 3 {
            return Err("Username must be at least 3 characters".to_string());
        }
        if !self.email.contains('@') {
            return Err("Email address is not valid".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        if self.role == Role::Admin {
            return Err("Cannot register as admin".to_string());
        }
        Ok(())
    }
}

/// Payload for `PUT /users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRole {
    pub role: Role,
}

/// Query parameters for `GET /users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// Free-text match on username or email.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegisterUser {
        RegisterUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
            role: Role::Participant,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_admin_role_rejected() {
        let mut input = valid();
        input.role = Role::Admin;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut input = valid();
        input.password = "short".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Admin, Role::Organizer, Role::Participant] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
