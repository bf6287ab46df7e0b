//! Route handlers for the coaching API.

pub mod accounts;
pub mod challenges;
pub mod health;
pub mod progress;
pub mod vocal;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        // Exercise progress
        .route("/progress", post(progress::record))
        .route("/progress/stats/:user_id", get(progress::stats))
        .route("/progress/all/:user_id", get(progress::combined))
        // Vocal curriculum
        .route("/vocal-exercises/progress", post(vocal::record))
        .route("/vocal-exercises/progress/:user_id", get(vocal::list))
        .route("/vocal-exercises/stats/:user_id", get(vocal::stats))
        // Daily speech challenges; the GET reads by account, the PUT
        // addresses one assignment
        .route("/speech-challenges/assign-daily", post(challenges::assign_daily))
        .route(
            "/speech-challenges/:id",
            get(challenges::list).put(challenges::update_status),
        )
        // Health check
        .route("/health", get(health::health))
}
