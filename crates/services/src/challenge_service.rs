use std::sync::Arc;

use coach_core::catalog;
use coach_core::model::{AccountId, AssignmentId, ChallengeAssignment, ChallengeStatus};
use rand::seq::IndexedRandom;
use storage::repository::{ChallengeRepository, NewAssignmentRecord, StorageError};

use crate::Clock;
use crate::error::ChallengeServiceError;

/// Outcome of a daily-assignment request.
///
/// `AlreadyAssigned` carries the open assignment that blocked a new one;
/// asking twice on the same calendar day is an idempotent no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyAssignment {
    Assigned(ChallengeAssignment),
    AlreadyAssigned(ChallengeAssignment),
}

impl DailyAssignment {
    #[must_use]
    pub fn assignment(&self) -> &ChallengeAssignment {
        match self {
            DailyAssignment::Assigned(a) | DailyAssignment::AlreadyAssigned(a) => a,
        }
    }

    #[must_use]
    pub fn already_assigned(&self) -> bool {
        matches!(self, DailyAssignment::AlreadyAssigned(_))
    }
}

/// Assigns one catalog challenge per account per UTC calendar day and
/// manages the assignment lifecycle.
#[derive(Clone)]
pub struct ChallengeService {
    clock: Clock,
    challenges: Arc<dyn ChallengeRepository>,
}

impl ChallengeService {
    #[must_use]
    pub fn new(clock: Clock, challenges: Arc<dyn ChallengeRepository>) -> Self {
        Self { clock, challenges }
    }

    /// Assign today's challenge, or return the one already open for today.
    ///
    /// The account's level is the highest level among its completed
    /// assignments (1 when nothing has been completed); skipped and
    /// in-progress assignments never advance it. The catalog entry is
    /// picked uniformly at random from the level's entries.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when `userId` is absent,
    /// `NoChallengesAvailable` when the catalog has no entries for the
    /// account's level, and `Storage` for persistence failures.
    pub async fn assign_daily(
        &self,
        user_id: Option<u64>,
    ) -> Result<DailyAssignment, ChallengeServiceError> {
        let account_id = user_id
            .map(AccountId::new)
            .ok_or(ChallengeServiceError::MissingField { field: "userId" })?;
        let today = self.clock.today();

        if let Some(open) = self.challenges.open_assignment_on(account_id, today).await? {
            return Ok(DailyAssignment::AlreadyAssigned(open));
        }

        let level = self
            .challenges
            .highest_completed_level(account_id)
            .await?
            .unwrap_or(1);
        let candidates = catalog::entries_for_level(level);
        let Some(pick) = candidates.choose(&mut rand::rng()) else {
            return Err(ChallengeServiceError::NoChallengesAvailable { level });
        };

        let record = NewAssignmentRecord {
            account_id,
            level,
            title: pick.title.to_string(),
            description: pick.description.to_string(),
            kind: pick.kind.to_string(),
            assigned_date: today,
        };

        match self.challenges.insert_assignment(record).await {
            Ok(assignment) => Ok(DailyAssignment::Assigned(assignment)),
            // A concurrent request won the check-then-insert race; its row
            // is the day's assignment.
            Err(StorageError::Conflict) => {
                let existing = self
                    .challenges
                    .open_assignment_on(account_id, today)
                    .await?
                    .ok_or(ChallengeServiceError::Storage(StorageError::Conflict))?;
                Ok(DailyAssignment::AlreadyAssigned(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Set an assignment's status. Completing stamps `completed_at`; any
    /// other status leaves the stored timestamp untouched.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when no status is supplied, `InvalidStatus`
    /// for an unknown value, and `Storage` if the update fails.
    pub async fn update_status(
        &self,
        id: AssignmentId,
        status: Option<String>,
    ) -> Result<(), ChallengeServiceError> {
        let raw = match status {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ChallengeServiceError::MissingField { field: "status" }),
        };
        let status = ChallengeStatus::parse(&raw)
            .map_err(|e| ChallengeServiceError::InvalidStatus { value: e.value })?;

        let completed_at = (status == ChallengeStatus::Completed).then(|| self.clock.now());
        self.challenges.set_status(id, status, completed_at).await?;
        Ok(())
    }

    /// All assignments for the account, level ascending then newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the query fails.
    pub async fn list(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<ChallengeAssignment>, ChallengeServiceError> {
        let assignments = self.challenges.list_for_account(account_id).await?;
        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service_with(repo: InMemoryRepository, clock: Clock) -> ChallengeService {
        ChallengeService::new(clock, Arc::new(repo))
    }

    #[tokio::test]
    async fn first_assignment_draws_from_level_one() {
        let service = service_with(InMemoryRepository::new(), Clock::fixed(fixed_now()));

        let outcome = service.assign_daily(Some(1)).await.unwrap();
        assert!(!outcome.already_assigned());

        let assignment = outcome.assignment();
        assert_eq!(assignment.level, 1);
        assert_eq!(assignment.status, ChallengeStatus::Pending);
        assert_eq!(assignment.assigned_date, fixed_now().date_naive());
        assert!(
            catalog::entries_for_level(1)
                .iter()
                .any(|entry| entry.title == assignment.title)
        );
    }

    #[tokio::test]
    async fn second_call_on_the_same_day_is_idempotent() {
        let repo = InMemoryRepository::new();
        let service = service_with(repo, Clock::fixed(fixed_now()));

        let first = service.assign_daily(Some(1)).await.unwrap();
        let second = service.assign_daily(Some(1)).await.unwrap();

        assert!(second.already_assigned());
        assert_eq!(second.assignment().id, first.assignment().id);

        let all = service.list(AccountId::new(1)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn level_follows_the_highest_completion() {
        let repo = InMemoryRepository::new();
        let mut clock = Clock::fixed(fixed_now());
        let service = service_with(repo.clone(), clock);

        let first = service.assign_daily(Some(1)).await.unwrap();
        service
            .update_status(first.assignment().id, Some("completed".to_string()))
            .await
            .unwrap();

        // Seed a level-2 completion directly; the next assignment must
        // follow the highest completed level, not the most recent one.
        let seeded = repo
            .insert_assignment(NewAssignmentRecord {
                account_id: AccountId::new(1),
                level: 2,
                title: "El Elogio Genuino".to_string(),
                description: "Haz un cumplido sincero".to_string(),
                kind: "verbal_short".to_string(),
                assigned_date: fixed_now().date_naive() - Duration::days(1),
            })
            .await
            .unwrap();
        repo.set_status(seeded.id, ChallengeStatus::Completed, Some(fixed_now()))
            .await
            .unwrap();

        clock.advance(Duration::days(1));
        let service = service_with(repo, clock);
        let next = service.assign_daily(Some(1)).await.unwrap();
        assert_eq!(next.assignment().level, 2);
    }

    #[tokio::test]
    async fn skipping_never_advances_the_level() {
        let repo = InMemoryRepository::new();
        let mut clock = Clock::fixed(fixed_now());
        let service = service_with(repo.clone(), clock);

        let first = service.assign_daily(Some(1)).await.unwrap();
        service
            .update_status(first.assignment().id, Some("skipped".to_string()))
            .await
            .unwrap();

        clock.advance(Duration::days(1));
        let service = service_with(repo, clock);
        let next = service.assign_daily(Some(1)).await.unwrap();
        assert_eq!(next.assignment().level, 1);
    }

    #[tokio::test]
    async fn exhausted_catalog_is_a_terminal_failure() {
        let repo = InMemoryRepository::new();
        let clock = Clock::fixed(fixed_now());

        // A completion beyond the catalog's highest level leaves the next
        // level with no entries.
        let beyond = catalog::max_level() + 1;
        let seeded = repo
            .insert_assignment(NewAssignmentRecord {
                account_id: AccountId::new(1),
                level: beyond,
                title: "Reto Final".to_string(),
                description: "Último reto".to_string(),
                kind: "long_term".to_string(),
                assigned_date: fixed_now().date_naive() - Duration::days(1),
            })
            .await
            .unwrap();
        repo.set_status(seeded.id, ChallengeStatus::Completed, Some(fixed_now()))
            .await
            .unwrap();

        let service = service_with(repo, clock);
        let err = service.assign_daily(Some(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ChallengeServiceError::NoChallengesAvailable { level } if level == beyond
        ));
    }

    #[tokio::test]
    async fn completing_today_frees_the_day_for_a_new_assignment() {
        let repo = InMemoryRepository::new();
        let service = service_with(repo, Clock::fixed(fixed_now()));

        let first = service.assign_daily(Some(1)).await.unwrap();
        service
            .update_status(first.assignment().id, Some("completed".to_string()))
            .await
            .unwrap();

        // The open-assignment check only counts pending/in_progress rows.
        let second = service.assign_daily(Some(1)).await.unwrap();
        assert!(!second.already_assigned());
        assert_ne!(second.assignment().id, first.assignment().id);
    }

    #[tokio::test]
    async fn update_requires_a_known_status() {
        let service = service_with(InMemoryRepository::new(), Clock::fixed(fixed_now()));

        let err = service
            .update_status(AssignmentId::new(1), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChallengeServiceError::MissingField { field: "status" }
        ));

        let err = service
            .update_status(AssignmentId::new(1), Some("done".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChallengeServiceError::InvalidStatus { .. }));
    }
}
