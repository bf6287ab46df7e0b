//! HTTP backend for the communication-coaching app.
//!
//! Exposes accounts, exercise progress, the vocal curriculum, and daily
//! speech challenges as a JSON API over SQLite.

mod config;
mod error;
mod routes;
mod state;

use services::{AppServices, Clock, CredentialService};
use storage::repository::Storage;
use storage::sqlite::SqliteRepository;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting coaching API server");

    // Connect and create/verify the schema before serving anything
    let db = SqliteRepository::connect(&config.database_url).await?;
    db.migrate().await?;

    // Assemble services over the shared storage; the raw handle stays
    // around for health probes
    let storage = Storage::from_sqlite(db.clone());
    let services = AppServices::new(
        &storage,
        Clock::default_clock(),
        CredentialService::new(config.token_secret),
    );
    let state = AppState::new(services, db);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Coaching API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
