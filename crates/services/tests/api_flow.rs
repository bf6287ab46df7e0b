use coach_core::time::fixed_clock;
use services::{
    AppServices, Clock, CredentialService, ExerciseSubmission, LoginInput, RegistrationInput,
    WeekStatusSubmission,
};
use storage::repository::Storage;

fn app(clock: Clock) -> AppServices {
    AppServices::new(
        &Storage::in_memory(),
        clock,
        CredentialService::new("test-secret"),
    )
}

#[tokio::test]
async fn register_login_record_and_read_stats() {
    let app = app(fixed_clock());

    let created = app
        .accounts()
        .register(RegistrationInput {
            name: Some("Ana".to_string()),
            email: Some("ana@x.com".to_string()),
            password: Some("secret1".to_string()),
        })
        .await
        .expect("register");

    let login = app
        .accounts()
        .login(LoginInput {
            username: None,
            email: Some("ana@x.com".to_string()),
            password: Some("secret1".to_string()),
        })
        .await
        .expect("login");
    assert!(!login.token.is_empty());
    assert_eq!(login.account, created);

    let entry_id = app
        .progress()
        .record(ExerciseSubmission {
            user_id: Some(created.id.value()),
            exercise_type: Some("respiration".to_string()),
            duration: Some(30),
            rounds_completed: Some(2),
            score: Some(80),
        })
        .await
        .expect("record");
    assert!(entry_id > 0);

    let stats = app.progress().stats(created.id).await.expect("stats");
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].exercise_type, "respiration");
    assert_eq!(stats[0].total_sessions, 1);
    assert_eq!(stats[0].total_time, 30);
    assert_eq!(stats[0].total_rounds, 2);
    assert!((stats[0].average_score - 80.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn combined_progress_spans_both_histories() {
    let app = app(fixed_clock());
    let account = coach_core::model::AccountId::new(1);

    app.progress()
        .record(ExerciseSubmission {
            user_id: Some(1),
            exercise_type: Some("paraphrase".to_string()),
            duration: Some(45),
            rounds_completed: Some(3),
            score: Some(70),
        })
        .await
        .unwrap();
    app.vocal()
        .upsert_week(WeekStatusSubmission {
            user_id: Some(1),
            week_number: Some(1),
            challenge_id: Some(1),
            status: Some("completed".to_string()),
        })
        .await
        .unwrap();

    let combined = app.progress().combined(account).await.unwrap();
    assert_eq!(combined.exercises.len(), 1);
    assert_eq!(combined.vocal_weeks.len(), 1);
    assert_eq!(combined.vocal_rollup.total_challenges, 1);
    assert_eq!(combined.vocal_rollup.completed_challenges, 1);
}

#[tokio::test]
async fn daily_challenge_cycle_over_several_days() {
    let mut clock = fixed_clock();
    let storage = Storage::in_memory();
    let credentials = CredentialService::new("test-secret");

    // Day 1: assign and complete.
    let app = AppServices::new(&storage, clock, credentials.clone());
    let first = app.challenges().assign_daily(Some(1)).await.unwrap();
    assert!(!first.already_assigned());
    assert_eq!(first.assignment().level, 1);
    app.challenges()
        .update_status(first.assignment().id, Some("completed".to_string()))
        .await
        .unwrap();

    // Day 2: a fresh day, a fresh assignment; repeat calls are no-ops.
    clock.advance(chrono::Duration::days(1));
    let app = AppServices::new(&storage, clock, credentials);
    let second = app.challenges().assign_daily(Some(1)).await.unwrap();
    assert!(!second.already_assigned());
    let repeat = app.challenges().assign_daily(Some(1)).await.unwrap();
    assert!(repeat.already_assigned());
    assert_eq!(repeat.assignment().id, second.assignment().id);

    let all = app
        .challenges()
        .list(coach_core::model::AccountId::new(1))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
