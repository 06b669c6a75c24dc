//! PostgreSQL implementation of RollRepository.
//!
//! The `rolls` table carries a partial unique index on `(decision_id)
//! WHERE followed IS NULL`; a second concurrent roll of the same
//! decision fails that index and is surfaced as `PendingRollExists`, so
//! the pending-roll invariant holds even when two requests race past
//! the handler's read check.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::decision::Decision;
use crate::domain::foundation::{ChoiceId, DecisionId, DomainError, ErrorCode, RollId, Timestamp, UserId};
use crate::domain::roll::{ChoiceWeightSnapshot, Roll, RollSnapshot};
use crate::ports::RollRepository;

use super::decision_repository::{db_error, update_config};

/// PostgreSQL implementation of RollRepository.
#[derive(Clone)]
pub struct PostgresRollRepository {
    pool: PgPool,
}

impl PostgresRollRepository {
    /// Creates a new PostgresRollRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn row_to_roll(&self, row: sqlx::postgres::PgRow) -> Result<Roll, DomainError> {
        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get roll id", e))?;
        let decision_id: uuid::Uuid = row
            .try_get("decision_id")
            .map_err(|e| db_error("Failed to get decision_id", e))?;
        let probability: Option<f64> = row
            .try_get("probability")
            .map_err(|e| db_error("Failed to get probability", e))?;
        let created_at: chrono::DateTime<chrono::Utc> = row
            .try_get("created_at")
            .map_err(|e| db_error("Failed to get created_at", e))?;

        let roll_id = RollId::from_uuid(id);
        let snapshot = match probability {
            Some(probability) => RollSnapshot::Binary { probability },
            None => {
                let weight_rows = sqlx::query(
                    r#"
                    SELECT choice_id, choice_name, weight
                    FROM roll_choice_weights
                    WHERE roll_id = $1
                    ORDER BY id
                    "#,
                )
                .bind(roll_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch roll choice weights", e))?;

                let mut weights = Vec::with_capacity(weight_rows.len());
                for w in weight_rows {
                    let choice_id: uuid::Uuid = w
                        .try_get("choice_id")
                        .map_err(|e| db_error("Failed to get choice_id", e))?;
                    weights.push(ChoiceWeightSnapshot {
                        choice_id: ChoiceId::from_uuid(choice_id),
                        choice_name: w
                            .try_get("choice_name")
                            .map_err(|e| db_error("Failed to get choice_name", e))?,
                        weight: w
                            .try_get("weight")
                            .map_err(|e| db_error("Failed to get weight", e))?,
                    });
                }
                RollSnapshot::MultiChoice { weights }
            }
        };

        Ok(Roll::reconstitute(
            roll_id,
            DecisionId::from_uuid(decision_id),
            row.try_get("result")
                .map_err(|e| db_error("Failed to get result", e))?,
            row.try_get("followed")
                .map_err(|e| db_error("Failed to get followed", e))?,
            snapshot,
            Timestamp::from_datetime(created_at),
        ))
    }

    async fn fetch_one_roll(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Option<Roll>, DomainError> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch roll", e))?;
        match row {
            Some(row) => Ok(Some(self.row_to_roll(row).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RollRepository for PostgresRollRepository {
    async fn create(&self, roll: &Roll) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let probability = match roll.snapshot() {
            RollSnapshot::Binary { probability } => Some(*probability),
            RollSnapshot::MultiChoice { .. } => None,
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO rolls (id, decision_id, result, followed, probability, created_at)
            VALUES ($1, $2, $3, NULL, $4, $5)
            "#,
        )
        .bind(roll.id().as_uuid())
        .bind(roll.decision_id().as_uuid())
        .bind(roll.result())
        .bind(probability)
        .bind(roll.created_at().as_datetime())
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false)
            {
                return Err(DomainError::new(
                    ErrorCode::PendingRollExists,
                    "A pending roll already exists for this decision",
                ));
            }
            return Err(db_error("Failed to insert roll", e));
        }

        if let RollSnapshot::MultiChoice { weights } = roll.snapshot() {
            for weight in weights {
                sqlx::query(
                    r#"
                    INSERT INTO roll_choice_weights (roll_id, choice_id, choice_name, weight)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(roll.id().as_uuid())
                .bind(weight.choice_id.as_uuid())
                .bind(&weight.choice_name)
                .bind(weight.weight)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to insert roll choice weight", e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit roll create", e))?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RollId,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        self.fetch_one_roll(
            sqlx::query(
                r#"
                SELECT id, decision_id, result, followed, probability, created_at
                FROM rolls
                WHERE id = $1 AND decision_id = $2
                "#,
            )
            .bind(*id.as_uuid())
            .bind(*decision_id.as_uuid()),
        )
        .await
    }

    async fn pending_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        self.fetch_one_roll(
            sqlx::query(
                r#"
                SELECT id, decision_id, result, followed, probability, created_at
                FROM rolls
                WHERE decision_id = $1 AND followed IS NULL
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(*decision_id.as_uuid()),
        )
        .await
    }

    async fn last_confirmed_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Option<Roll>, DomainError> {
        self.fetch_one_roll(
            sqlx::query(
                r#"
                SELECT id, decision_id, result, followed, probability, created_at
                FROM rolls
                WHERE decision_id = $1 AND followed IS NOT NULL
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(*decision_id.as_uuid()),
        )
        .await
    }

    async fn list_by_decision(&self, decision_id: &DecisionId) -> Result<Vec<Roll>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, decision_id, result, followed, probability, created_at
            FROM rolls
            WHERE decision_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(decision_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch rolls", e))?;

        let mut rolls = Vec::with_capacity(rows.len());
        for row in rows {
            rolls.push(self.row_to_roll(row).await?);
        }
        Ok(rolls)
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM rolls r
            JOIN decisions d ON d.id = r.decision_id
            WHERE d.user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count rolls", e))?;

        Ok(result.0 as u64)
    }

    async fn confirm(&self, roll: &Roll, promoted: Option<&Decision>) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = sqlx::query("UPDATE rolls SET followed = $2 WHERE id = $1")
            .bind(roll.id().as_uuid())
            .bind(roll.followed())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to update roll", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RollNotFound,
                format!("Roll not found: {}", roll.id()),
            ));
        }

        // Follow-through: promote the snapshot to live config in the
        // same transaction as the flag flip.
        if let Some(decision) = promoted {
            sqlx::query("UPDATE decisions SET updated_at = $2 WHERE id = $1")
                .bind(decision.id().as_uuid())
                .bind(decision.updated_at().as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to touch decision", e))?;
            update_config(&mut tx, decision).await?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit roll confirm", e))?;
        Ok(())
    }
}
