//! Registration and login endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use coach_core::model::AccountSummary;
use services::{LoginInput, RegistrationInput};

use crate::error::ApiError;
use crate::state::AppState;

/// Client-facing account view.
#[derive(Serialize)]
pub struct UserDto {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<AccountSummary> for UserDto {
    fn from(summary: AccountSummary) -> Self {
        Self {
            id: summary.id.value(),
            name: summary.name,
            email: summary.email,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    success: bool,
    message: &'static str,
    user: UserDto,
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let summary = state
        .services
        .accounts()
        .register(RegistrationInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(RegisterResponse {
        success: true,
        message: "account created",
        user: summary.into(),
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    success: bool,
    message: &'static str,
    token: String,
    user: UserDto,
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .services
        .accounts()
        .login(LoginInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "login successful",
        token: outcome.token,
        user: outcome.account.into(),
    }))
}
