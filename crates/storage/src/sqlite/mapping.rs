use coach_core::model::{
    Account, AccountId, AssignmentId, ChallengeAssignment, ChallengeStatus, ExerciseStats,
    VocalRollup, VocalStatus, VocalWeekStatus,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps write failures, turning unique-constraint violations into
/// `StorageError::Conflict` so callers can react to them.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn account_id_from_i64(v: i64) -> Result<AccountId, StorageError> {
    Ok(AccountId::new(i64_to_u64("account_id", v)?))
}

pub(crate) fn assignment_id_from_i64(v: i64) -> Result<AssignmentId, StorageError> {
    Ok(AssignmentId::new(i64_to_u64("assignment_id", v)?))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<Account, StorageError> {
    Ok(Account::from_persisted(
        account_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("display_name").map_err(ser)?,
        row.try_get::<String, _>("email").map_err(ser)?,
        row.try_get::<String, _>("password_hash").map_err(ser)?,
    ))
}

pub(crate) fn map_stats_row(row: &sqlx::sqlite::SqliteRow) -> Result<ExerciseStats, StorageError> {
    Ok(ExerciseStats {
        exercise_type: row.try_get("exercise_type").map_err(ser)?,
        total_sessions: row.try_get("total_sessions").map_err(ser)?,
        total_time: row.try_get("total_time").map_err(ser)?,
        total_rounds: row.try_get("total_rounds").map_err(ser)?,
        average_score: row.try_get("average_score").map_err(ser)?,
        last_session: row.try_get("last_session").map_err(ser)?,
    })
}

pub(crate) fn map_week_row(row: &sqlx::sqlite::SqliteRow) -> Result<VocalWeekStatus, StorageError> {
    let status_str: String = row.try_get("status").map_err(ser)?;
    Ok(VocalWeekStatus {
        week_number: u32_from_i64("week_number", row.try_get::<i64, _>("week_number").map_err(ser)?)?,
        challenge_id: u32_from_i64("challenge_id", row.try_get::<i64, _>("challenge_id").map_err(ser)?)?,
        status: VocalStatus::parse(&status_str).map_err(ser)?,
        started_at: row.try_get("started_at").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}

pub(crate) fn map_rollup_row(row: &sqlx::sqlite::SqliteRow) -> Result<VocalRollup, StorageError> {
    // SUM over zero rows is NULL; an empty curriculum reads as all zeros.
    Ok(VocalRollup {
        total_challenges: row.try_get("total_challenges").map_err(ser)?,
        completed_challenges: row
            .try_get::<Option<i64>, _>("completed_challenges")
            .map_err(ser)?
            .unwrap_or(0),
        in_progress_challenges: row
            .try_get::<Option<i64>, _>("in_progress_challenges")
            .map_err(ser)?
            .unwrap_or(0),
        last_completion: row.try_get("last_completion").map_err(ser)?,
    })
}

pub(crate) fn map_assignment_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ChallengeAssignment, StorageError> {
    let status_str: String = row.try_get("status").map_err(ser)?;
    Ok(ChallengeAssignment {
        id: assignment_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        account_id: account_id_from_i64(row.try_get::<i64, _>("account_id").map_err(ser)?)?,
        level: u32_from_i64("level", row.try_get::<i64, _>("level").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        kind: row.try_get("kind").map_err(ser)?,
        status: ChallengeStatus::parse(&status_str).map_err(ser)?,
        assigned_date: row.try_get("assigned_date").map_err(ser)?,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}
