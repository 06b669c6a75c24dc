//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::decision_repository::db_error;

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, hashed_password, created_at, is_active, is_guest, guest_token
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at().as_datetime())
        .bind(user.is_active())
        .bind(user.is_guest())
        .bind(user.guest_token())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert user", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, hashed_password, created_at, is_active, is_guest, guest_token
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, hashed_password, created_at, is_active, is_guest, guest_token
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user by email", e))?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                hashed_password = $3,
                is_active = $4,
                is_guest = $5,
                guest_token = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.is_active())
        .bind(user.is_guest())
        .bind(user.guest_token())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update user", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id()),
            ));
        }
        Ok(())
    }
}

fn row_to_user(row: sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| db_error("Failed to get id", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_error("Failed to get created_at", e))?;

    Ok(User::reconstitute(
        UserId::from_uuid(id),
        row.try_get("email")
            .map_err(|e| db_error("Failed to get email", e))?,
        row.try_get("hashed_password")
            .map_err(|e| db_error("Failed to get hashed_password", e))?,
        Timestamp::from_datetime(created_at),
        row.try_get("is_active")
            .map_err(|e| db_error("Failed to get is_active", e))?,
        row.try_get("is_guest")
            .map_err(|e| db_error("Failed to get is_guest", e))?,
        row.try_get("guest_token")
            .map_err(|e| db_error("Failed to get guest_token", e))?,
    ))
}
