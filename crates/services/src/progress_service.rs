use std::sync::Arc;

use coach_core::model::{AccountId, ExerciseStats, VocalRollup, VocalWeekStatus};
use storage::repository::{NewProgressRecord, ProgressRepository, VocalProgressRepository};

use crate::Clock;
use crate::error::ProgressServiceError;

/// Raw exercise-completion input as received from the client. Numeric
/// fields default to 0 when absent.
#[derive(Debug, Clone, Default)]
pub struct ExerciseSubmission {
    pub user_id: Option<u64>,
    pub exercise_type: Option<String>,
    pub duration: Option<i64>,
    pub rounds_completed: Option<i64>,
    pub score: Option<i64>,
}

/// Everything the progress screen shows in one shape: generic exercise
/// aggregates plus the vocal curriculum and its rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedProgress {
    pub exercises: Vec<ExerciseStats>,
    pub vocal_weeks: Vec<VocalWeekStatus>,
    pub vocal_rollup: VocalRollup,
}

/// Records exercise completions and aggregates progress history.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    vocal: Arc<dyn VocalProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        vocal: Arc<dyn VocalProgressRepository>,
    ) -> Self {
        Self {
            clock,
            progress,
            vocal,
        }
    }

    /// Append one completion event; the completion timestamp is
    /// server-assigned.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when `userId` or `exerciseType` is absent or
    /// empty, and `Storage` if persistence fails.
    pub async fn record(
        &self,
        submission: ExerciseSubmission,
    ) -> Result<i64, ProgressServiceError> {
        let account_id = submission
            .user_id
            .map(AccountId::new)
            .ok_or(ProgressServiceError::MissingField { field: "userId" })?;
        let exercise_type = match submission.exercise_type {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(ProgressServiceError::MissingField {
                    field: "exerciseType",
                });
            }
        };

        let entry_id = self
            .progress
            .append_entry(NewProgressRecord {
                account_id,
                exercise_type,
                duration_seconds: submission.duration.unwrap_or(0),
                rounds_completed: submission.rounds_completed.unwrap_or(0),
                score: submission.score.unwrap_or(0),
                completed_at: self.clock.now(),
            })
            .await?;
        Ok(entry_id)
    }

    /// Per-exercise-type aggregates over the full history; empty for an
    /// account with no entries.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the aggregation query fails.
    pub async fn stats(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ExerciseStats>, ProgressServiceError> {
        let stats = self.progress.stats_by_exercise(account_id).await?;
        Ok(stats)
    }

    /// Fan out the three progress reads in parallel; any failure fails the
    /// whole call, there is no partial result.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if any of the sub-reads fails.
    pub async fn combined(
        &self,
        account_id: AccountId,
    ) -> Result<CombinedProgress, ProgressServiceError> {
        let (exercises, vocal_weeks, vocal_rollup) = tokio::try_join!(
            self.progress.stats_by_exercise(account_id),
            self.vocal.weeks_for_account(account_id),
            self.vocal.rollup_for_account(account_id),
        )?;
        Ok(CombinedProgress {
            exercises,
            vocal_weeks,
            vocal_rollup,
        })
    }
}
