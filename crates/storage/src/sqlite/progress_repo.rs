use coach_core::model::{AccountId, ExerciseStats};

use super::SqliteRepository;
use super::mapping::{id_i64, map_stats_row};
use crate::repository::{NewProgressRecord, ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn append_entry(&self, entry: NewProgressRecord) -> Result<i64, StorageError> {
        let account_id = id_i64("account_id", entry.account_id.value())?;

        let res = sqlx::query(
            r"
                INSERT INTO exercise_progress (
                    account_id, exercise_type, duration_seconds,
                    rounds_completed, score, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(account_id)
        .bind(entry.exercise_type)
        .bind(entry.duration_seconds)
        .bind(entry.rounds_completed)
        .bind(entry.score)
        .bind(entry.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn stats_by_exercise(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ExerciseStats>, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let rows = sqlx::query(
            r"
                SELECT
                    exercise_type,
                    COUNT(*) AS total_sessions,
                    SUM(duration_seconds) AS total_time,
                    SUM(rounds_completed) AS total_rounds,
                    AVG(score) AS average_score,
                    MAX(completed_at) AS last_session
                FROM exercise_progress
                WHERE account_id = ?1
                GROUP BY exercise_type
                ORDER BY exercise_type ASC
            ",
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_stats_row(&row)?);
        }
        Ok(out)
    }
}
