//! User repository for database operations.

use sqlx::PgPool;

use campus_market_core::{Email, UserId, UserRole};

use super::{RepositoryError, map_constraint_violation};
use crate::models::User;

/// Fields required to create a user.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub student_id: Option<String>,
    pub level: i32,
    pub gender: Option<String>,
}

/// Partial update of a user record. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub student_id: Option<String>,
    pub level: Option<i32>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<UserRole>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Whether the email (or the student ID, when given) is already in use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_or_student_id_taken(
        &self,
        email: &Email,
        student_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM users WHERE email = $1 OR ($2::text IS NOT NULL AND student_id = $2) LIMIT 1",
        )
        .bind(email)
        .bind(student_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.is_some())
    }

    /// List all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(self.pool)
            .await?;
        Ok(users)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or student ID is
    /// already in use (UNIQUE constraints are the authority; the pre-check
    /// in the auth service only improves the error message).
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (name, email, password_hash, student_id, level, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.student_id)
        .bind(new_user.level)
        .bind(new_user.gender)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "email or student id already in use"))?;
        Ok(user)
    }

    /// Apply a partial update to a user.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email or student ID
    /// collides with another user.
    pub async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                student_id = COALESCE($5, student_id),
                level = COALESCE($6, level),
                gender = COALESCE($7, gender),
                avatar = COALESCE($8, avatar),
                role = COALESCE($9, role),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.student_id)
        .bind(changes.level)
        .bind(changes.gender)
        .bind(changes.avatar)
        .bind(changes.role)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "email or student id already in use"))?;
        Ok(user)
    }

    /// Delete a user, returning the removed record.
    ///
    /// Returns `None` if the user does not exist. Favorite links are removed
    /// by `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }
}
