use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: accounts, the append-only exercise-progress log,
/// the vocal-curriculum week rows, challenge assignments, and indexes. The
/// partial unique index on open assignments is what makes the one-open-
/// assignment-per-day rule hold under concurrent writers; callers treat its
/// violation as "someone else already assigned today".
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS accounts (
                    id INTEGER PRIMARY KEY,
                    display_name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // Account ids in the three history tables are unchecked references:
        // writes for ids that never registered must still succeed.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS exercise_progress (
                    id INTEGER PRIMARY KEY,
                    account_id INTEGER NOT NULL,
                    exercise_type TEXT NOT NULL,
                    duration_seconds INTEGER NOT NULL,
                    rounds_completed INTEGER NOT NULL,
                    score INTEGER NOT NULL,
                    completed_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS vocal_week_progress (
                    id INTEGER PRIMARY KEY,
                    account_id INTEGER NOT NULL,
                    week_number INTEGER NOT NULL CHECK (week_number >= 1),
                    challenge_id INTEGER NOT NULL,
                    status TEXT NOT NULL,
                    started_at TEXT,
                    completed_at TEXT,
                    UNIQUE (account_id, week_number)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS challenge_assignments (
                    id INTEGER PRIMARY KEY,
                    account_id INTEGER NOT NULL,
                    level INTEGER NOT NULL CHECK (level >= 1),
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    status TEXT NOT NULL,
                    assigned_date TEXT NOT NULL,
                    completed_at TEXT
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_assignments_open_day
                    ON challenge_assignments (account_id, assigned_date)
                    WHERE status IN ('pending', 'in_progress');
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_progress_account_type
                    ON exercise_progress (account_id, exercise_type);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_assignments_account_level
                    ON challenge_assignments (account_id, level, assigned_date);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
