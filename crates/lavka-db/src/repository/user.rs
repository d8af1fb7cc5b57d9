//! # User Repository
//!
//! Database operations for accounts.
//!
//! The `roles` column is a single comma-separated VARCHAR; the stored row
//! type [`UserRecord`] keeps it raw, and conversion into the domain
//! [`User`] parses it exactly once per request.

use sqlx::PgPool;
use tracing::debug;

use lavka_core::roles::{parse_roles, roles_to_column};
use lavka_core::User;

use crate::error::{DbError, DbResult};

/// A `users` row as stored, including the password hash.
///
/// The hash never leaves the auth layer; domain code sees [`User`] only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub roles: String,
}

impl UserRecord {
    /// Converts the stored row into the domain user.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            is_active: self.is_active,
            roles: parse_roles(&self.roles),
        }
    }
}

/// Fields for inserting a new account row.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: PgPool) -> Self {
        UserRepository { pool }
    }

    /// Gets an account by login name.
    ///
    /// ## Returns
    /// * `Ok(Some(UserRecord))` - account found
    /// * `Ok(None)` - no such username
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        debug!(username = %username, "Looking up user");

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, hashed_password, is_active, roles
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Ok(UserRecord)` - inserted row with its assigned id
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn insert(&self, new_user: &NewUserRecord) -> DbResult<UserRecord> {
        debug!(username = %new_user.username, "Inserting user");

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, email, hashed_password, is_active, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, hashed_password, is_active, roles
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(new_user.is_active)
        .bind(roles_to_column(&new_user.roles))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Counts accounts holding the given role.
    ///
    /// Used by the startup bootstrap to decide whether an initial admin
    /// account must be created.
    pub async fn count_with_role(&self, role: &str) -> DbResult<i64> {
        let pattern = format!("%{}%", role);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE roles LIKE $1")
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Flips the active flag on an account.
    pub async fn set_active(&self, username: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE username = $1")
            .bind(username)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_into_user_parses_roles() {
        let record = UserRecord {
            id: 7,
            username: "manager42".to_string(),
            email: Some("m@example.com".to_string()),
            hashed_password: "$argon2id$...".to_string(),
            is_active: true,
            roles: "manager, user".to_string(),
        };

        let user = record.into_user();
        assert_eq!(user.id, 7);
        assert_eq!(user.roles, vec!["manager", "user"]);
        assert!(user.has_any_role(&["manager"]));
    }
}
