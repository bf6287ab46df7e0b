//! Vocal-curriculum endpoints: week upsert, ordered list, rollup.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coach_core::model::{AccountId, VocalRollup, VocalWeekStatus};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    user_id: Option<u64>,
    week_number: Option<u32>,
    challenge_id: Option<u32>,
    status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    success: bool,
    message: &'static str,
    progress_id: i64,
}

/// `POST /vocal-exercises/progress`
pub async fn record(
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, ApiError> {
    let progress_id = state
        .services
        .vocal()
        .upsert_week(services::WeekStatusSubmission {
            user_id: payload.user_id,
            week_number: payload.week_number,
            challenge_id: payload.challenge_id,
            status: payload.status,
        })
        .await?;

    Ok(Json(RecordResponse {
        success: true,
        message: "vocal exercise progress saved",
        progress_id,
    }))
}

/// One curriculum row in the shape the curriculum screen expects
/// (snake_case field names are part of the client contract).
#[derive(Serialize)]
pub struct WeekStatusDto {
    week_number: u32,
    challenge_id: u32,
    status: &'static str,
    start_date: Option<DateTime<Utc>>,
    completion_date: Option<DateTime<Utc>>,
}

impl From<VocalWeekStatus> for WeekStatusDto {
    fn from(week: VocalWeekStatus) -> Self {
        Self {
            week_number: week.week_number,
            challenge_id: week.challenge_id,
            status: week.status.as_str(),
            start_date: week.started_at,
            completion_date: week.completed_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse {
    success: bool,
    progress: Vec<WeekStatusDto>,
}

/// `GET /vocal-exercises/progress/:user_id`
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<ListResponse>, ApiError> {
    let weeks = state
        .services
        .vocal()
        .week_statuses(AccountId::new(user_id))
        .await?;

    Ok(Json(ListResponse {
        success: true,
        progress: weeks.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Serialize)]
pub struct RollupDto {
    total_challenges: i64,
    completed_challenges: i64,
    in_progress_challenges: i64,
    last_completion: Option<DateTime<Utc>>,
}

impl From<VocalRollup> for RollupDto {
    fn from(rollup: VocalRollup) -> Self {
        Self {
            total_challenges: rollup.total_challenges,
            completed_challenges: rollup.completed_challenges,
            in_progress_challenges: rollup.in_progress_challenges,
            last_completion: rollup.last_completion,
        }
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    stats: RollupDto,
}

/// `GET /vocal-exercises/stats/:user_id`
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<StatsResponse>, ApiError> {
    let rollup = state
        .services
        .vocal()
        .rollup(AccountId::new(user_id))
        .await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: rollup.into(),
    }))
}
