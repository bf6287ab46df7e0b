use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::account_service::AccountService;
use crate::challenge_service::ChallengeService;
use crate::credentials::CredentialService;
use crate::progress_service::ProgressService;
use crate::vocal_service::VocalService;

/// Assembles the app-facing services over a shared storage backend.
#[derive(Clone)]
pub struct AppServices {
    accounts: Arc<AccountService>,
    progress: Arc<ProgressService>,
    vocal: Arc<VocalService>,
    challenges: Arc<ChallengeService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, credentials: CredentialService) -> Self {
        let accounts = Arc::new(AccountService::new(
            clock,
            Arc::clone(&storage.accounts),
            credentials,
        ));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            Arc::clone(&storage.vocal),
        ));
        let vocal = Arc::new(VocalService::new(clock, Arc::clone(&storage.vocal)));
        let challenges = Arc::new(ChallengeService::new(
            clock,
            Arc::clone(&storage.challenges),
        ));

        Self {
            accounts,
            progress,
            vocal,
            challenges,
        }
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn vocal(&self) -> Arc<VocalService> {
        Arc::clone(&self.vocal)
    }

    #[must_use]
    pub fn challenges(&self) -> Arc<ChallengeService> {
        Arc::clone(&self.challenges)
    }
}
