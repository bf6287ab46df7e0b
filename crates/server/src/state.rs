//! Application state shared across handlers.

use services::AppServices;
use storage::sqlite::SqliteRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Assembled domain services.
    pub services: AppServices,
    /// Database handle, kept for health probes.
    pub db: SqliteRepository,
}

impl AppState {
    /// Create new application state.
    pub fn new(services: AppServices, db: SqliteRepository) -> Self {
        Self { services, db }
    }
}
