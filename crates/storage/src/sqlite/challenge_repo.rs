use chrono::{DateTime, NaiveDate, Utc};
use coach_core::model::{
    AccountId, AssignmentId, ChallengeAssignment, ChallengeStatus,
};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    assignment_id_from_i64, id_i64, map_assignment_row, ser, u32_from_i64, write_err,
};
use crate::repository::{ChallengeRepository, NewAssignmentRecord, StorageError};

#[async_trait::async_trait]
impl ChallengeRepository for SqliteRepository {
    async fn open_assignment_on(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<Option<ChallengeAssignment>, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let row = sqlx::query(
            r"
                SELECT id, account_id, level, title, description, kind,
                       status, assigned_date, completed_at
                FROM challenge_assignments
                WHERE account_id = ?1
                  AND assigned_date = ?2
                  AND status IN ('pending', 'in_progress')
            ",
        )
        .bind(account)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_assignment_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn highest_completed_level(
        &self,
        account_id: AccountId,
    ) -> Result<Option<u32>, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let row = sqlx::query(
            r"
                SELECT MAX(level) AS max_level
                FROM challenge_assignments
                WHERE account_id = ?1 AND status = 'completed'
            ",
        )
        .bind(account)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let max_level: Option<i64> = row.try_get("max_level").map_err(ser)?;
        max_level
            .map(|level| u32_from_i64("level", level))
            .transpose()
    }

    async fn insert_assignment(
        &self,
        record: NewAssignmentRecord,
    ) -> Result<ChallengeAssignment, StorageError> {
        let account = id_i64("account_id", record.account_id.value())?;
        let status = ChallengeStatus::Pending;

        // The partial unique index on open (account, date) pairs turns a
        // concurrent double-assign into a Conflict here.
        let res = sqlx::query(
            r"
                INSERT INTO challenge_assignments (
                    account_id, level, title, description, kind,
                    status, assigned_date, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)
            ",
        )
        .bind(account)
        .bind(i64::from(record.level))
        .bind(record.title.clone())
        .bind(record.description.clone())
        .bind(record.kind.clone())
        .bind(status.as_str())
        .bind(record.assigned_date)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(ChallengeAssignment {
            id: assignment_id_from_i64(res.last_insert_rowid())?,
            account_id: record.account_id,
            level: record.level,
            title: record.title,
            description: record.description,
            kind: record.kind,
            status,
            assigned_date: record.assigned_date,
            completed_at: None,
        })
    }

    async fn set_status(
        &self,
        id: AssignmentId,
        status: ChallengeStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        let assignment = id_i64("assignment_id", id.value())?;

        // COALESCE keeps the stored completion timestamp when the new status
        // does not produce one (a skip never erases an earlier completion).
        sqlx::query(
            r"
                UPDATE challenge_assignments
                SET status = ?2,
                    completed_at = COALESCE(?3, completed_at)
                WHERE id = ?1
            ",
        )
        .bind(assignment)
        .bind(status.as_str())
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ChallengeAssignment>, StorageError> {
        let account = id_i64("account_id", account_id.value())?;

        let rows = sqlx::query(
            r"
                SELECT id, account_id, level, title, description, kind,
                       status, assigned_date, completed_at
                FROM challenge_assignments
                WHERE account_id = ?1
                ORDER BY level ASC, assigned_date DESC, id DESC
            ",
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_assignment_row(&row)?);
        }
        Ok(out)
    }
}
