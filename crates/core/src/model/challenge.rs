use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::{AccountId, AssignmentId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid challenge status: {value}")]
pub struct ParseChallengeStatusError {
    pub value: String,
}

/// Lifecycle state of a daily challenge assignment.
///
/// `pending → in_progress → completed`, with a side exit from either open
/// state to `skipped`. `completed` and `skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl ChallengeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeStatus::Pending => "pending",
            ChallengeStatus::InProgress => "in_progress",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Skipped => "skipped",
        }
    }

    /// Parse the wire/storage representation.
    ///
    /// # Errors
    ///
    /// Returns `ParseChallengeStatusError` for any unknown value.
    pub fn parse(s: &str) -> Result<Self, ParseChallengeStatusError> {
        match s {
            "pending" => Ok(ChallengeStatus::Pending),
            "in_progress" => Ok(ChallengeStatus::InProgress),
            "completed" => Ok(ChallengeStatus::Completed),
            "skipped" => Ok(ChallengeStatus::Skipped),
            other => Err(ParseChallengeStatusError {
                value: other.to_string(),
            }),
        }
    }

    /// An open assignment blocks a new one for the same calendar day.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, ChallengeStatus::Pending | ChallengeStatus::InProgress)
    }
}

/// A daily, level-gated behavioral challenge drawn from the fixed catalog.
///
/// The catalog entry's text is denormalized into the row at assignment
/// time, so historical assignments keep their wording even if the catalog
/// changes in a later release.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeAssignment {
    pub id: AssignmentId,
    pub account_id: AccountId,
    pub level: u32,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: ChallengeStatus,
    pub assigned_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ChallengeStatus::Pending,
            ChallengeStatus::InProgress,
            ChallengeStatus::Completed,
            ChallengeStatus::Skipped,
        ] {
            assert_eq!(ChallengeStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn only_pending_and_in_progress_are_open() {
        assert!(ChallengeStatus::Pending.is_open());
        assert!(ChallengeStatus::InProgress.is_open());
        assert!(!ChallengeStatus::Completed.is_open());
        assert!(!ChallengeStatus::Skipped.is_open());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(ChallengeStatus::parse("done").is_err());
    }
}
