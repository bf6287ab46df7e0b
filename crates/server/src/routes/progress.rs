//! Exercise-progress endpoints: record, per-type stats, combined view.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coach_core::model::{AccountId, ExerciseStats};

use crate::error::ApiError;
use crate::routes::vocal::{RollupDto, WeekStatusDto};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    user_id: Option<u64>,
    exercise_type: Option<String>,
    duration: Option<i64>,
    rounds_completed: Option<i64>,
    score: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    success: bool,
    progress_id: i64,
    message: &'static str,
}

/// `POST /progress`
pub async fn record(
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, ApiError> {
    let progress_id = state
        .services
        .progress()
        .record(services::ExerciseSubmission {
            user_id: payload.user_id,
            exercise_type: payload.exercise_type,
            duration: payload.duration,
            rounds_completed: payload.rounds_completed,
            score: payload.score,
        })
        .await?;

    Ok(Json(RecordResponse {
        success: true,
        progress_id,
        message: "progress saved",
    }))
}

/// One aggregate row per exercise type, in the shape the progress screen
/// expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStatsDto {
    exercise_type: String,
    total_sessions: i64,
    total_time: i64,
    total_rounds: i64,
    average_score: f64,
    last_session: Option<DateTime<Utc>>,
}

impl From<ExerciseStats> for ExerciseStatsDto {
    fn from(stats: ExerciseStats) -> Self {
        Self {
            exercise_type: stats.exercise_type,
            total_sessions: stats.total_sessions,
            total_time: stats.total_time,
            total_rounds: stats.total_rounds,
            average_score: stats.average_score,
            last_session: stats.last_session,
        }
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    stats: Vec<ExerciseStatsDto>,
}

/// `GET /progress/stats/:user_id`
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state
        .services
        .progress()
        .stats(AccountId::new(user_id))
        .await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: stats.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Serialize)]
pub struct CombinedResponse {
    success: bool,
    data: CombinedData,
}

#[derive(Serialize)]
pub struct CombinedData {
    exercises: Vec<ExerciseStatsDto>,
    #[serde(rename = "vocalExercises")]
    vocal_exercises: Vec<WeekStatusDto>,
    stats: CombinedStats,
}

#[derive(Serialize)]
pub struct CombinedStats {
    vocal: RollupDto,
}

/// `GET /progress/all/:user_id`: fail-fast fan-out of the three progress
/// reads.
pub async fn combined(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<CombinedResponse>, ApiError> {
    let combined = state
        .services
        .progress()
        .combined(AccountId::new(user_id))
        .await?;

    Ok(Json(CombinedResponse {
        success: true,
        data: CombinedData {
            exercises: combined.exercises.into_iter().map(Into::into).collect(),
            vocal_exercises: combined.vocal_weeks.into_iter().map(Into::into).collect(),
            stats: CombinedStats {
                vocal: combined.vocal_rollup.into(),
            },
        },
    }))
}
