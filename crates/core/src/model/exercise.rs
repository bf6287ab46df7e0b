use chrono::{DateTime, Utc};

/// Per-exercise-type aggregate over an account's full progress history.
///
/// Recomputed from the append-only log on every call; there is no
/// incremental bookkeeping to keep consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStats {
    pub exercise_type: String,
    pub total_sessions: i64,
    pub total_time: i64,
    pub total_rounds: i64,
    pub average_score: f64,
    pub last_session: Option<DateTime<Utc>>,
}
