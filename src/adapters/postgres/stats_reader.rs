//! PostgreSQL implementation of StatsReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{ServiceStats, StatsReader};

use super::decision_repository::db_error;

/// PostgreSQL implementation of StatsReader.
#[derive(Clone)]
pub struct PostgresStatsReader {
    pool: PgPool,
}

impl PostgresStatsReader {
    /// Creates a new PostgresStatsReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &'static str) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count", e))?;
        Ok(result.0 as u64)
    }

    async fn count_since(
        &self,
        sql: &'static str,
        since: &Timestamp,
    ) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as(sql)
            .bind(since.as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count", e))?;
        Ok(result.0 as u64)
    }
}

#[async_trait]
impl StatsReader for PostgresStatsReader {
    async fn service_stats(&self, today_start: &Timestamp) -> Result<ServiceStats, DomainError> {
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let guest_users = self
            .count("SELECT COUNT(*) FROM users WHERE is_guest = TRUE")
            .await?;
        let total_decisions = self.count("SELECT COUNT(*) FROM decisions").await?;
        let total_rolls = self.count("SELECT COUNT(*) FROM rolls").await?;
        let new_users_today = self
            .count_since("SELECT COUNT(*) FROM users WHERE created_at >= $1", today_start)
            .await?;
        let rolls_today = self
            .count_since("SELECT COUNT(*) FROM rolls WHERE created_at >= $1", today_start)
            .await?;

        Ok(ServiceStats {
            total_users,
            guest_users,
            registered_users: total_users - guest_users,
            total_decisions,
            total_rolls,
            new_users_today,
            rolls_today,
        })
    }
}
