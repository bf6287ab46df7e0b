use std::sync::Arc;

use coach_core::model::{AccountId, VocalRollup, VocalStatus, VocalWeekStatus};
use storage::repository::{VocalProgressRepository, WeekUpsertRecord};

use crate::Clock;
use crate::error::VocalServiceError;

/// Raw week-status input as received from the client.
#[derive(Debug, Clone, Default)]
pub struct WeekStatusSubmission {
    pub user_id: Option<u64>,
    pub week_number: Option<u32>,
    pub challenge_id: Option<u32>,
    pub status: Option<String>,
}

/// Tracks the fixed 10-week vocal curriculum per account.
#[derive(Clone)]
pub struct VocalService {
    clock: Clock,
    vocal: Arc<dyn VocalProgressRepository>,
}

impl VocalService {
    #[must_use]
    pub fn new(clock: Clock, vocal: Arc<dyn VocalProgressRepository>) -> Self {
        Self { clock, vocal }
    }

    /// Upsert the `(account, week)` status row.
    ///
    /// `started_at` is stamped when the new status is in-progress or
    /// completed, `completed_at` when it is completed. Earlier non-null
    /// timestamps survive a status regression; the upsert is atomic.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for an absent input, `InvalidStatus` for an
    /// unknown status value, and `Storage` if the upsert fails.
    pub async fn upsert_week(
        &self,
        submission: WeekStatusSubmission,
    ) -> Result<i64, VocalServiceError> {
        let account_id = submission
            .user_id
            .map(AccountId::new)
            .ok_or(VocalServiceError::MissingField { field: "userId" })?;
        let week_number = submission
            .week_number
            .ok_or(VocalServiceError::MissingField {
                field: "weekNumber",
            })?;
        let challenge_id = submission
            .challenge_id
            .ok_or(VocalServiceError::MissingField {
                field: "challengeId",
            })?;
        let status_raw = match submission.status {
            Some(s) if !s.is_empty() => s,
            _ => return Err(VocalServiceError::MissingField { field: "status" }),
        };
        let status = VocalStatus::parse(&status_raw)
            .map_err(|e| VocalServiceError::InvalidStatus { value: e.value })?;

        let now = self.clock.now();
        let row_id = self
            .vocal
            .upsert_week(WeekUpsertRecord {
                account_id,
                week_number,
                challenge_id,
                status,
                started_at: status.marks_started().then_some(now),
                completed_at: (status == VocalStatus::Completed).then_some(now),
            })
            .await?;
        Ok(row_id)
    }

    /// All week rows for the account, ordered by week number ascending.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn week_statuses(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<VocalWeekStatus>, VocalServiceError> {
        let weeks = self.vocal.weeks_for_account(account_id).await?;
        Ok(weeks)
    }

    /// Rollup counts over the account's curriculum rows.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn rollup(&self, account_id: AccountId) -> Result<VocalRollup, VocalServiceError> {
        let rollup = self.vocal.rollup_for_account(account_id).await?;
        Ok(rollup)
    }
}
