//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: String,
}

/// `GET /health`: liveness of the process and the database.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "OK",
                message: "server and database are up".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("health check failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Health {
                    status: "ERROR",
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
