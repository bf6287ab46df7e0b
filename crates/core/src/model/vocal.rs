use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid vocal status: {value}")]
pub struct ParseVocalStatusError {
    pub value: String,
}

/// Completion state of one week in the fixed 10-week vocal curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocalStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl VocalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VocalStatus::NotStarted => "not_started",
            VocalStatus::InProgress => "in_progress",
            VocalStatus::Completed => "completed",
        }
    }

    /// Parse the wire/storage representation.
    ///
    /// # Errors
    ///
    /// Returns `ParseVocalStatusError` for any unknown value.
    pub fn parse(s: &str) -> Result<Self, ParseVocalStatusError> {
        match s {
            "not_started" => Ok(VocalStatus::NotStarted),
            "in_progress" => Ok(VocalStatus::InProgress),
            "completed" => Ok(VocalStatus::Completed),
            other => Err(ParseVocalStatusError {
                value: other.to_string(),
            }),
        }
    }

    /// Whether reaching this status means the week has been started.
    #[must_use]
    pub fn marks_started(self) -> bool {
        matches!(self, VocalStatus::InProgress | VocalStatus::Completed)
    }
}

/// One persisted `(account, week)` curriculum row.
///
/// `started_at` and `completed_at` are monotonic: once set, a later upsert
/// may overwrite them only with a fresh non-null timestamp, never erase them.
#[derive(Debug, Clone, PartialEq)]
pub struct VocalWeekStatus {
    pub week_number: u32,
    pub challenge_id: u32,
    pub status: VocalStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Rollup counts over all of an account's curriculum rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VocalRollup {
    pub total_challenges: i64,
    pub completed_challenges: i64,
    pub in_progress_challenges: i64,
    pub last_completion: Option<DateTime<Utc>>,
}
