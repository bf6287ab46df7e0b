//! Daily speech-challenge endpoints: list, assign-daily, status update.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use coach_core::model::{AccountId, AssignmentId, ChallengeAssignment};
use services::DailyAssignment;

use crate::error::ApiError;
use crate::state::AppState;

/// One assignment in the shape the challenges screen expects.
#[derive(Serialize)]
pub struct ChallengeDto {
    id: u64,
    level: u32,
    title: String,
    description: String,
    #[serde(rename = "type")]
    kind: String,
    status: &'static str,
    assigned_date: NaiveDate,
    completed_date: Option<DateTime<Utc>>,
}

impl From<ChallengeAssignment> for ChallengeDto {
    fn from(assignment: ChallengeAssignment) -> Self {
        Self {
            id: assignment.id.value(),
            level: assignment.level,
            title: assignment.title,
            description: assignment.description,
            kind: assignment.kind,
            status: assignment.status.as_str(),
            assigned_date: assignment.assigned_date,
            completed_date: assignment.completed_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse {
    success: bool,
    challenges: Vec<ChallengeDto>,
}

/// `GET /speech-challenges/:user_id`
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<ListResponse>, ApiError> {
    let assignments = state
        .services
        .challenges()
        .list(AccountId::new(user_id))
        .await?;

    Ok(Json(ListResponse {
        success: true,
        challenges: assignments.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDailyRequest {
    user_id: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDailyResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    already_assigned: Option<bool>,
    challenge: ChallengeDto,
    message: &'static str,
}

/// `POST /speech-challenges/assign-daily`
///
/// Idempotent per account per UTC day: a second call returns the existing
/// open assignment flagged `alreadyAssigned` and writes nothing.
pub async fn assign_daily(
    State(state): State<AppState>,
    Json(payload): Json<AssignDailyRequest>,
) -> Result<Json<AssignDailyResponse>, ApiError> {
    let outcome = state
        .services
        .challenges()
        .assign_daily(payload.user_id)
        .await?;

    let response = match outcome {
        DailyAssignment::Assigned(assignment) => AssignDailyResponse {
            success: true,
            already_assigned: None,
            challenge: assignment.into(),
            message: "new challenge assigned for today",
        },
        DailyAssignment::AlreadyAssigned(assignment) => AssignDailyResponse {
            success: true,
            already_assigned: Some(true),
            challenge: assignment.into(),
            message: "a challenge is already assigned for today",
        },
    };
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    status: Option<String>,
    // Accepted for client compatibility, not stored.
    #[allow(dead_code)]
    notes: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    success: bool,
    message: &'static str,
}

/// `PUT /speech-challenges/:challenge_id`
pub async fn update_status(
    State(state): State<AppState>,
    Path(challenge_id): Path<u64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    state
        .services
        .challenges()
        .update_status(AssignmentId::new(challenge_id), payload.status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        success: true,
        message: "challenge updated",
    }))
}
