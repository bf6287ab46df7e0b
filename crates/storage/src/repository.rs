use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use coach_core::model::{
    Account, AccountId, AssignmentId, ChallengeAssignment, ChallengeStatus, ExerciseStats,
    LoginIdentifier, VocalRollup, VocalStatus, VocalWeekStatus,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a new account row.
#[derive(Debug, Clone)]
pub struct NewAccountRecord {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for one exercise-completion event.
#[derive(Debug, Clone)]
pub struct NewProgressRecord {
    pub account_id: AccountId,
    pub exercise_type: String,
    pub duration_seconds: i64,
    pub rounds_completed: i64,
    pub score: i64,
    pub completed_at: DateTime<Utc>,
}

/// Upsert shape for one `(account, week)` curriculum row.
///
/// `started_at`/`completed_at` carry `None` when the new status does not
/// produce that timestamp; the adapter must keep any stored non-null value
/// in that case (the write is a single atomic upsert).
#[derive(Debug, Clone)]
pub struct WeekUpsertRecord {
    pub account_id: AccountId,
    pub week_number: u32,
    pub challenge_id: u32,
    pub status: VocalStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert shape for a daily challenge assignment. Status starts at pending.
#[derive(Debug, Clone)]
pub struct NewAssignmentRecord {
    pub account_id: AccountId,
    pub level: u32,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub assigned_date: NaiveDate,
}

/// Repository contract for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already registered,
    /// or other storage errors.
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError>;

    /// Look up an account by display name or email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup cannot be performed.
    async fn find_account(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Account>, StorageError>;
}

/// Repository contract for the append-only exercise-progress log.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Append one completion event; never conflicts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn append_entry(&self, entry: NewProgressRecord) -> Result<i64, StorageError>;

    /// Aggregate the full history into one row per exercise type,
    /// ordered by exercise type ascending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the aggregation query fails.
    async fn stats_by_exercise(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ExerciseStats>, StorageError>;
}

/// Repository contract for the 10-week vocal curriculum.
#[async_trait]
pub trait VocalProgressRepository: Send + Sync {
    /// Insert or update the `(account, week)` row, returning its id.
    ///
    /// Status is overwritten unconditionally; timestamps only when the new
    /// value is non-null.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the upsert fails.
    async fn upsert_week(&self, record: WeekUpsertRecord) -> Result<i64, StorageError>;

    /// All weeks for the account, ordered by week number ascending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn weeks_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<VocalWeekStatus>, StorageError>;

    /// Conditional-aggregation rollup over all of the account's rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn rollup_for_account(&self, account_id: AccountId)
    -> Result<VocalRollup, StorageError>;
}

/// Repository contract for daily speech-challenge assignments.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// The open (pending or in-progress) assignment for the given calendar
    /// day, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn open_assignment_on(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<Option<ChallengeAssignment>, StorageError>;

    /// Highest level among the account's completed assignments, `None` when
    /// nothing has been completed yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn highest_completed_level(
        &self,
        account_id: AccountId,
    ) -> Result<Option<u32>, StorageError>;

    /// Insert a new pending assignment, returning the created row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when an open assignment already
    /// exists for the same `(account, date)`; the calendar-day singleton is
    /// enforced here, not by a caller-side check.
    async fn insert_assignment(
        &self,
        record: NewAssignmentRecord,
    ) -> Result<ChallengeAssignment, StorageError>;

    /// Set the status of an assignment; stamps `completed_at` only when a
    /// fresh timestamp is supplied. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn set_status(
        &self,
        id: AssignmentId,
        status: ChallengeStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError>;

    /// All assignments for the account, ordered by level ascending then
    /// assignment date descending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ChallengeAssignment>, StorageError>;
}

// In-memory rows keep the insert order; ids are 1-based positions.
#[derive(Debug, Clone)]
struct ProgressRow {
    account_id: AccountId,
    exercise_type: String,
    duration_seconds: i64,
    rounds_completed: i64,
    score: i64,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct VocalRow {
    id: i64,
    account_id: AccountId,
    week: VocalWeekStatus,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
    progress: Arc<Mutex<Vec<ProgressRow>>>,
    vocal: Arc<Mutex<Vec<VocalRow>>>,
    assignments: Arc<Mutex<Vec<ChallengeAssignment>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn insert_account(&self, account: NewAccountRecord) -> Result<AccountId, StorageError> {
        let mut guard = self.accounts.lock().map_err(lock_err)?;
        if guard.iter().any(|a| a.email() == account.email) {
            return Err(StorageError::Conflict);
        }
        let id = AccountId::new(guard.len() as u64 + 1);
        guard.push(Account::from_persisted(
            id,
            account.display_name,
            account.email,
            account.password_hash,
        ));
        Ok(id)
    }

    async fn find_account(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Account>, StorageError> {
        let guard = self.accounts.lock().map_err(lock_err)?;
        let found = guard
            .iter()
            .find(|a| match identifier {
                LoginIdentifier::Name(name) => a.display_name() == name,
                LoginIdentifier::Email(email) => a.email() == email,
            })
            .cloned();
        Ok(found)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn append_entry(&self, entry: NewProgressRecord) -> Result<i64, StorageError> {
        let mut guard = self.progress.lock().map_err(lock_err)?;
        guard.push(ProgressRow {
            account_id: entry.account_id,
            exercise_type: entry.exercise_type,
            duration_seconds: entry.duration_seconds,
            rounds_completed: entry.rounds_completed,
            score: entry.score,
            completed_at: entry.completed_at,
        });
        Ok(guard.len() as i64)
    }

    async fn stats_by_exercise(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ExerciseStats>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;

        // (sessions, time, rounds, score sum, last session), keyed and
        // ordered by exercise type.
        let mut grouped: BTreeMap<String, (i64, i64, i64, i64, DateTime<Utc>)> = BTreeMap::new();
        for row in guard.iter().filter(|r| r.account_id == account_id) {
            let slot = grouped
                .entry(row.exercise_type.clone())
                .or_insert((0, 0, 0, 0, row.completed_at));
            slot.0 += 1;
            slot.1 += row.duration_seconds;
            slot.2 += row.rounds_completed;
            slot.3 += row.score;
            if row.completed_at > slot.4 {
                slot.4 = row.completed_at;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let stats = grouped
            .into_iter()
            .map(
                |(exercise_type, (sessions, time, rounds, score_sum, last))| ExerciseStats {
                    exercise_type,
                    total_sessions: sessions,
                    total_time: time,
                    total_rounds: rounds,
                    average_score: score_sum as f64 / sessions as f64,
                    last_session: Some(last),
                },
            )
            .collect();
        Ok(stats)
    }
}

#[async_trait]
impl VocalProgressRepository for InMemoryRepository {
    async fn upsert_week(&self, record: WeekUpsertRecord) -> Result<i64, StorageError> {
        let mut guard = self.vocal.lock().map_err(lock_err)?;

        if let Some(row) = guard.iter_mut().find(|r| {
            r.account_id == record.account_id && r.week.week_number == record.week_number
        }) {
            row.week.challenge_id = record.challenge_id;
            row.week.status = record.status;
            if let Some(started) = record.started_at {
                row.week.started_at = Some(started);
            }
            if let Some(completed) = record.completed_at {
                row.week.completed_at = Some(completed);
            }
            return Ok(row.id);
        }

        let id = guard.len() as i64 + 1;
        guard.push(VocalRow {
            id,
            account_id: record.account_id,
            week: VocalWeekStatus {
                week_number: record.week_number,
                challenge_id: record.challenge_id,
                status: record.status,
                started_at: record.started_at,
                completed_at: record.completed_at,
            },
        });
        Ok(id)
    }

    async fn weeks_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<VocalWeekStatus>, StorageError> {
        let guard = self.vocal.lock().map_err(lock_err)?;
        let mut weeks: Vec<VocalWeekStatus> = guard
            .iter()
            .filter(|r| r.account_id == account_id)
            .map(|r| r.week.clone())
            .collect();
        weeks.sort_by_key(|w| w.week_number);
        Ok(weeks)
    }

    async fn rollup_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<VocalRollup, StorageError> {
        let guard = self.vocal.lock().map_err(lock_err)?;
        let mut rollup = VocalRollup {
            total_challenges: 0,
            completed_challenges: 0,
            in_progress_challenges: 0,
            last_completion: None,
        };
        for row in guard.iter().filter(|r| r.account_id == account_id) {
            rollup.total_challenges += 1;
            match row.week.status {
                VocalStatus::Completed => rollup.completed_challenges += 1,
                VocalStatus::InProgress => rollup.in_progress_challenges += 1,
                VocalStatus::NotStarted => {}
            }
            if row.week.completed_at > rollup.last_completion {
                rollup.last_completion = row.week.completed_at;
            }
        }
        Ok(rollup)
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryRepository {
    async fn open_assignment_on(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<Option<ChallengeAssignment>, StorageError> {
        let guard = self.assignments.lock().map_err(lock_err)?;
        let found = guard
            .iter()
            .find(|a| a.account_id == account_id && a.assigned_date == date && a.status.is_open())
            .cloned();
        Ok(found)
    }

    async fn highest_completed_level(
        &self,
        account_id: AccountId,
    ) -> Result<Option<u32>, StorageError> {
        let guard = self.assignments.lock().map_err(lock_err)?;
        let level = guard
            .iter()
            .filter(|a| a.account_id == account_id && a.status == ChallengeStatus::Completed)
            .map(|a| a.level)
            .max();
        Ok(level)
    }

    async fn insert_assignment(
        &self,
        record: NewAssignmentRecord,
    ) -> Result<ChallengeAssignment, StorageError> {
        let mut guard = self.assignments.lock().map_err(lock_err)?;
        let open_exists = guard.iter().any(|a| {
            a.account_id == record.account_id
                && a.assigned_date == record.assigned_date
                && a.status.is_open()
        });
        if open_exists {
            return Err(StorageError::Conflict);
        }

        let assignment = ChallengeAssignment {
            id: AssignmentId::new(guard.len() as u64 + 1),
            account_id: record.account_id,
            level: record.level,
            title: record.title,
            description: record.description,
            kind: record.kind,
            status: ChallengeStatus::Pending,
            assigned_date: record.assigned_date,
            completed_at: None,
        };
        guard.push(assignment.clone());
        Ok(assignment)
    }

    async fn set_status(
        &self,
        id: AssignmentId,
        status: ChallengeStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        let mut guard = self.assignments.lock().map_err(lock_err)?;
        if let Some(assignment) = guard.iter_mut().find(|a| a.id == id) {
            assignment.status = status;
            if let Some(ts) = completed_at {
                assignment.completed_at = Some(ts);
            }
        }
        Ok(())
    }

    async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ChallengeAssignment>, StorageError> {
        let guard = self.assignments.lock().map_err(lock_err)?;
        let mut assignments: Vec<ChallengeAssignment> = guard
            .iter()
            .filter(|a| a.account_id == account_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| {
            a.level
                .cmp(&b.level)
                .then(b.assigned_date.cmp(&a.assigned_date))
                .then(b.id.cmp(&a.id))
        });
        Ok(assignments)
    }
}

/// Aggregates the per-entity repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub vocal: Arc<dyn VocalProgressRepository>,
    pub challenges: Arc<dyn ChallengeRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let vocal: Arc<dyn VocalProgressRepository> = Arc::new(repo.clone());
        let challenges: Arc<dyn ChallengeRepository> = Arc::new(repo);
        Self {
            accounts,
            progress,
            vocal,
            challenges,
        }
    }
}
