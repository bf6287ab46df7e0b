use coach_core::model::{AccountId, VocalRollup, VocalWeekStatus};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{id_i64, map_rollup_row, map_week_row, ser};
use crate::repository::{StorageError, VocalProgressRepository, WeekUpsertRecord};

#[async_trait::async_trait]
impl VocalProgressRepository for SqliteRepository {
    async fn upsert_week(&self, record: WeekUpsertRecord) -> Result<i64, StorageError> {
        let account_id = id_i64("account_id", record.account_id.value())?;

        // Single atomic upsert: status always wins, timestamps only when the
        // new value is non-null. A status regression must not erase an
        // earlier started_at/completed_at.
        let row = sqlx::query(
            r"
                INSERT INTO vocal_week_progress (
                    account_id, week_number, challenge_id, status, started_at, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(account_id, week_number) DO UPDATE SET
                    challenge_id = excluded.challenge_id,
                    status = excluded.status,
                    started_at = COALESCE(excluded.started_at, started_at),
                    completed_at = COALESCE(excluded.completed_at, completed_at)
                RETURNING id
            ",
        )
        .bind(account_id)
        .bind(i64::from(record.week_number))
        .bind(i64::from(record.challenge_id))
        .bind(record.status.as_str())
        .bind(record.started_at)
        .bind(record.completed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.try_get("id").map_err(ser)
    }

    async fn weeks_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<VocalWeekStatus>, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let rows = sqlx::query(
            r"
                SELECT week_number, challenge_id, status, started_at, completed_at
                FROM vocal_week_progress
                WHERE account_id = ?1
                ORDER BY week_number ASC
            ",
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_week_row(&row)?);
        }
        Ok(out)
    }

    async fn rollup_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<VocalRollup, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let row = sqlx::query(
            r"
                SELECT
                    COUNT(*) AS total_challenges,
                    SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END) AS completed_challenges,
                    SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END) AS in_progress_challenges,
                    MAX(completed_at) AS last_completion
                FROM vocal_week_progress
                WHERE account_id = ?1
            ",
        )
        .bind(account)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        map_rollup_row(&row)
    }
}
