//! PostgreSQL implementation of DecisionRepository.
//!
//! The aggregate spans three tables (decisions + one config table per
//! shape + choices); every write that touches more than one row runs in
//! a transaction together with its history entries.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::decision::{Decision, DecisionConfig, DecisionKind, HistoryEntry};
use crate::domain::foundation::{
    ChoiceId, DecisionId, DomainError, ErrorCode, Granularity, Timestamp, UserId,
};
use crate::ports::DecisionRepository;

/// PostgreSQL implementation of DecisionRepository.
#[derive(Clone)]
pub struct PostgresDecisionRepository {
    pool: PgPool,
}

impl PostgresDecisionRepository {
    /// Creates a new PostgresDecisionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_config(
        &self,
        id: &DecisionId,
        kind: DecisionKind,
    ) -> Result<DecisionConfig, DomainError> {
        match kind {
            DecisionKind::Binary => {
                let row = sqlx::query(
                    r#"
                    SELECT probability, granularity, yes_text, no_text
                    FROM binary_decisions
                    WHERE decision_id = $1
                    "#,
                )
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch binary config", e))?;

                let granularity = Granularity::from_level(row.try_get("granularity").map_err(
                    |e| db_error("Failed to get granularity", e),
                )?)?;
                Decision::stored_binary_config(
                    row.try_get("probability")
                        .map_err(|e| db_error("Failed to get probability", e))?,
                    granularity,
                    row.try_get("yes_text")
                        .map_err(|e| db_error("Failed to get yes_text", e))?,
                    row.try_get("no_text")
                        .map_err(|e| db_error("Failed to get no_text", e))?,
                )
            }
            DecisionKind::MultiChoice => {
                let cfg_row = sqlx::query(
                    "SELECT weight_granularity FROM multi_choice_decisions WHERE decision_id = $1",
                )
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch multi-choice config", e))?;

                let granularity = Granularity::from_level(
                    cfg_row
                        .try_get("weight_granularity")
                        .map_err(|e| db_error("Failed to get weight_granularity", e))?,
                )?;

                let choice_rows = sqlx::query(
                    r#"
                    SELECT id, name, weight, display_order
                    FROM choices
                    WHERE decision_id = $1
                    ORDER BY display_order
                    "#,
                )
                .bind(id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch choices", e))?;

                let mut choices = Vec::with_capacity(choice_rows.len());
                for row in choice_rows {
                    let choice_id: uuid::Uuid = row
                        .try_get("id")
                        .map_err(|e| db_error("Failed to get choice id", e))?;
                    choices.push((
                        ChoiceId::from_uuid(choice_id),
                        row.try_get("name")
                            .map_err(|e| db_error("Failed to get choice name", e))?,
                        row.try_get("weight")
                            .map_err(|e| db_error("Failed to get choice weight", e))?,
                        row.try_get("display_order")
                            .map_err(|e| db_error("Failed to get display_order", e))?,
                    ));
                }
                Decision::stored_multi_choice_config(granularity, choices)
            }
        }
    }

    async fn row_to_decision(&self, row: sqlx::postgres::PgRow) -> Result<Decision, DomainError> {
        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get id", e))?;
        let user_id: uuid::Uuid = row
            .try_get("user_id")
            .map_err(|e| db_error("Failed to get user_id", e))?;
        let kind_str: String = row
            .try_get("type")
            .map_err(|e| db_error("Failed to get type", e))?;
        let kind = str_to_kind(&kind_str)?;
        let decision_id = DecisionId::from_uuid(id);

        let config = self.load_config(&decision_id, kind).await?;

        let created_at: chrono::DateTime<chrono::Utc> = row
            .try_get("created_at")
            .map_err(|e| db_error("Failed to get created_at", e))?;
        let updated_at: chrono::DateTime<chrono::Utc> = row
            .try_get("updated_at")
            .map_err(|e| db_error("Failed to get updated_at", e))?;

        Ok(Decision::reconstitute(
            decision_id,
            UserId::from_uuid(user_id),
            row.try_get("title")
                .map_err(|e| db_error("Failed to get title", e))?,
            row.try_get("cooldown_hours")
                .map_err(|e| db_error("Failed to get cooldown_hours", e))?,
            row.try_get("display_order")
                .map_err(|e| db_error("Failed to get display_order", e))?,
            config,
            Timestamp::from_datetime(created_at),
            Timestamp::from_datetime(updated_at),
        ))
    }
}

#[async_trait]
impl DecisionRepository for PostgresDecisionRepository {
    async fn create(
        &self,
        decision: &Decision,
        history: &[HistoryEntry],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO decisions (
                id, user_id, title, type, cooldown_hours, display_order, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(decision.id().as_uuid())
        .bind(decision.user_id().as_uuid())
        .bind(decision.title())
        .bind(decision.kind().as_str())
        .bind(decision.cooldown_hours())
        .bind(decision.display_order())
        .bind(decision.created_at().as_datetime())
        .bind(decision.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert decision", e))?;

        match decision.config() {
            DecisionConfig::Binary(cfg) => {
                sqlx::query(
                    r#"
                    INSERT INTO binary_decisions (
                        decision_id, probability, granularity, yes_text, no_text
                    ) VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(decision.id().as_uuid())
                .bind(cfg.probability().value())
                .bind(cfg.granularity().level())
                .bind(cfg.yes_text())
                .bind(cfg.no_text())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to insert binary config", e))?;
            }
            DecisionConfig::MultiChoice(cfg) => {
                sqlx::query(
                    r#"
                    INSERT INTO multi_choice_decisions (decision_id, weight_granularity)
                    VALUES ($1, $2)
                    "#,
                )
                .bind(decision.id().as_uuid())
                .bind(cfg.granularity().level())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to insert multi-choice config", e))?;

                for choice in cfg.choices() {
                    sqlx::query(
                        r#"
                        INSERT INTO choices (id, decision_id, name, weight, display_order)
                        VALUES ($1, $2, $3, $4, $5)
                        "#,
                    )
                    .bind(choice.id().as_uuid())
                    .bind(decision.id().as_uuid())
                    .bind(choice.name())
                    .bind(choice.weight().value())
                    .bind(choice.display_order())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to insert choice", e))?;
                }
            }
        }

        insert_history(&mut tx, history).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit decision create", e))?;
        Ok(())
    }

    async fn update(
        &self,
        decision: &Decision,
        history: &[HistoryEntry],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE decisions SET
                title = $2,
                cooldown_hours = $3,
                display_order = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(decision.id().as_uuid())
        .bind(decision.title())
        .bind(decision.cooldown_hours())
        .bind(decision.display_order())
        .bind(decision.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update decision", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", decision.id()),
            ));
        }

        update_config(&mut tx, decision).await?;
        insert_history(&mut tx, history).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit decision update", e))?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DecisionId,
        user_id: &UserId,
    ) -> Result<Option<Decision>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, type, cooldown_hours, display_order,
                   created_at, updated_at
            FROM decisions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch decision", e))?;

        match row {
            Some(row) => Ok(Some(self.row_to_decision(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Decision>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, type, cooldown_hours, display_order,
                   created_at, updated_at
            FROM decisions
            WHERE user_id = $1
            ORDER BY display_order ASC, created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch decisions by user", e))?;

        let mut decisions = Vec::with_capacity(rows.len());
        for row in rows {
            decisions.push(self.row_to_decision(row).await?);
        }
        Ok(decisions)
    }

    async fn delete(&self, id: &DecisionId, user_id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM decisions WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete decision", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM decisions WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count decisions", e))?;

        Ok(result.0 as u64)
    }

    async fn next_display_order(&self, user_id: &UserId) -> Result<i32, DomainError> {
        let result: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(display_order), 0) + 1 FROM decisions WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to compute display order", e))?;

        Ok(result.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Writes the type-specific config rows for an already-updated decision.
///
/// Shared with the roll confirm path, which promotes a snapshot onto the
/// live config inside its own transaction.
pub(crate) async fn update_config(
    tx: &mut Transaction<'_, Postgres>,
    decision: &Decision,
) -> Result<(), DomainError> {
    match decision.config() {
        DecisionConfig::Binary(cfg) => {
            sqlx::query(
                r#"
                UPDATE binary_decisions SET
                    probability = $2,
                    granularity = $3,
                    yes_text = $4,
                    no_text = $5
                WHERE decision_id = $1
                "#,
            )
            .bind(decision.id().as_uuid())
            .bind(cfg.probability().value())
            .bind(cfg.granularity().level())
            .bind(cfg.yes_text())
            .bind(cfg.no_text())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to update binary config", e))?;
        }
        DecisionConfig::MultiChoice(cfg) => {
            sqlx::query(
                "UPDATE multi_choice_decisions SET weight_granularity = $2 WHERE decision_id = $1",
            )
            .bind(decision.id().as_uuid())
            .bind(cfg.granularity().level())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to update multi-choice config", e))?;

            for choice in cfg.choices() {
                sqlx::query("UPDATE choices SET name = $2, weight = $3 WHERE id = $1")
                    .bind(choice.id().as_uuid())
                    .bind(choice.name())
                    .bind(choice.weight().value())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| db_error("Failed to update choice", e))?;
            }
        }
    }
    Ok(())
}

/// Appends history entries inside the caller's transaction.
async fn insert_history(
    tx: &mut Transaction<'_, Postgres>,
    history: &[HistoryEntry],
) -> Result<(), DomainError> {
    for entry in history {
        match entry {
            HistoryEntry::Probability {
                decision_id,
                probability,
                changed_at,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO probability_history (decision_id, probability, changed_at)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(decision_id.as_uuid())
                .bind(probability)
                .bind(changed_at.as_datetime())
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("Failed to insert probability history", e))?;
            }
            HistoryEntry::Weight {
                choice_id,
                weight,
                changed_at,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO weight_history (choice_id, weight, changed_at)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(choice_id.as_uuid())
                .bind(weight)
                .bind(changed_at.as_datetime())
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("Failed to insert weight history", e))?;
            }
        }
    }
    Ok(())
}

fn str_to_kind(s: &str) -> Result<DecisionKind, DomainError> {
    match s {
        "binary" => Ok(DecisionKind::Binary),
        "multi_choice" => Ok(DecisionKind::MultiChoice),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid decision type: {}", s),
        )),
    }
}

pub(crate) fn db_error(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}
