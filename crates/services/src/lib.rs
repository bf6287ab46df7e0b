#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod challenge_service;
pub mod credentials;
pub mod error;
pub mod progress_service;
pub mod vocal_service;

pub use coach_core::Clock;

pub use account_service::{AccountService, LoginInput, LoginOutcome, RegistrationInput};
pub use app_services::AppServices;
pub use challenge_service::{ChallengeService, DailyAssignment};
pub use credentials::{CredentialService, SessionClaims};
pub use error::{
    AccountServiceError, ChallengeServiceError, ProgressServiceError, VocalServiceError,
};
pub use progress_service::{CombinedProgress, ExerciseSubmission, ProgressService};
pub use vocal_service::{VocalService, WeekStatusSubmission};
