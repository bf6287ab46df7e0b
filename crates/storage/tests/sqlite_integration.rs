use chrono::Duration;
use coach_core::model::{
    AccountId, ChallengeStatus, LoginIdentifier, VocalStatus,
};
use coach_core::time::fixed_now;
use storage::repository::{
    AccountRepository, ChallengeRepository, NewAccountRecord, NewAssignmentRecord,
    NewProgressRecord, ProgressRepository, StorageError, VocalProgressRepository,
    WeekUpsertRecord,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn account_record(name: &str, email: &str) -> NewAccountRecord {
    NewAccountRecord {
        display_name: name.to_string(),
        email: email.to_string(),
        password_hash: "$2b$12$hash".to_string(),
        created_at: fixed_now(),
    }
}

fn progress_record(
    account_id: AccountId,
    exercise_type: &str,
    duration: i64,
    rounds: i64,
    score: i64,
    offset_minutes: i64,
) -> NewProgressRecord {
    NewProgressRecord {
        account_id,
        exercise_type: exercise_type.to_string(),
        duration_seconds: duration,
        rounds_completed: rounds,
        score,
        completed_at: fixed_now() + Duration::minutes(offset_minutes),
    }
}

fn assignment_record(account_id: AccountId, level: u32, day_offset: i64) -> NewAssignmentRecord {
    NewAssignmentRecord {
        account_id,
        level,
        title: "El Saludo Diario".to_string(),
        description: "Saluda con contacto visual".to_string(),
        kind: "non_verbal".to_string(),
        assigned_date: fixed_now().date_naive() + Duration::days(day_offset),
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected_without_a_second_row() {
    let repo = connect("memdb_dup_email").await;

    let id = repo
        .insert_account(account_record("Ana", "ana@x.com"))
        .await
        .unwrap();

    let err = repo
        .insert_account(account_record("Otra Ana", "ana@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let found = repo
        .find_account(&LoginIdentifier::Email("ana@x.com".to_string()))
        .await
        .unwrap()
        .expect("account");
    assert_eq!(found.id(), id);
    assert_eq!(found.display_name(), "Ana");
}

#[tokio::test]
async fn account_is_found_by_name_or_email() {
    let repo = connect("memdb_find_account").await;
    repo.insert_account(account_record("Ana", "ana@x.com"))
        .await
        .unwrap();

    let by_name = repo
        .find_account(&LoginIdentifier::Name("Ana".to_string()))
        .await
        .unwrap();
    assert!(by_name.is_some());

    let by_email = repo
        .find_account(&LoginIdentifier::Email("ana@x.com".to_string()))
        .await
        .unwrap();
    assert!(by_email.is_some());

    let missing = repo
        .find_account(&LoginIdentifier::Name("ana@x.com".to_string()))
        .await
        .unwrap();
    assert!(missing.is_none(), "name lookup must not match the email column");
}

#[tokio::test]
async fn stats_aggregate_per_exercise_type() {
    let repo = connect("memdb_stats").await;
    let account = AccountId::new(1);
    let other = AccountId::new(2);

    for (duration, score, offset) in [(10, 50, 0), (20, 60, 1), (30, 70, 2)] {
        repo.append_entry(progress_record(account, "respiration", duration, 1, score, offset))
            .await
            .unwrap();
    }
    repo.append_entry(progress_record(account, "pauses", 5, 0, 90, 3))
        .await
        .unwrap();
    // Noise from another account must not leak in.
    repo.append_entry(progress_record(other, "respiration", 999, 9, 1, 4))
        .await
        .unwrap();

    let stats = repo.stats_by_exercise(account).await.unwrap();
    assert_eq!(stats.len(), 2);

    // Ordered by exercise type ascending.
    assert_eq!(stats[0].exercise_type, "pauses");
    assert_eq!(stats[0].total_sessions, 1);
    assert_eq!(stats[0].total_time, 5);
    assert!((stats[0].average_score - 90.0).abs() < f64::EPSILON);

    assert_eq!(stats[1].exercise_type, "respiration");
    assert_eq!(stats[1].total_sessions, 3);
    assert_eq!(stats[1].total_time, 60);
    assert_eq!(stats[1].total_rounds, 3);
    assert!((stats[1].average_score - 60.0).abs() < f64::EPSILON);
    assert_eq!(
        stats[1].last_session,
        Some(fixed_now() + Duration::minutes(2))
    );
}

#[tokio::test]
async fn stats_for_an_empty_account_are_empty() {
    let repo = connect("memdb_stats_empty").await;
    let stats = repo.stats_by_exercise(AccountId::new(42)).await.unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn week_upsert_overwrites_status_but_preserves_timestamps() {
    let repo = connect("memdb_week_upsert").await;
    let account = AccountId::new(1);
    let t1 = fixed_now();

    let first_id = repo
        .upsert_week(WeekUpsertRecord {
            account_id: account,
            week_number: 2,
            challenge_id: 2,
            status: VocalStatus::Completed,
            started_at: Some(t1),
            completed_at: Some(t1),
        })
        .await
        .unwrap();

    // Same key again: one row per (account, week).
    let second_id = repo
        .upsert_week(WeekUpsertRecord {
            account_id: account,
            week_number: 2,
            challenge_id: 2,
            status: VocalStatus::InProgress,
            started_at: Some(t1 + Duration::hours(2)),
            completed_at: None,
        })
        .await
        .unwrap();
    assert_eq!(first_id, second_id);

    let weeks = repo.weeks_for_account(account).await.unwrap();
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].status, VocalStatus::InProgress);
    // started_at was overwritten with a fresh non-null value.
    assert_eq!(weeks[0].started_at, Some(t1 + Duration::hours(2)));
    // completed_at survived the null write.
    assert_eq!(weeks[0].completed_at, Some(t1));
}

#[tokio::test]
async fn weeks_are_ordered_and_rolled_up() {
    let repo = connect("memdb_week_rollup").await;
    let account = AccountId::new(1);
    let t1 = fixed_now();

    for (week, status) in [
        (3_u32, VocalStatus::NotStarted),
        (1, VocalStatus::Completed),
        (2, VocalStatus::InProgress),
    ] {
        repo.upsert_week(WeekUpsertRecord {
            account_id: account,
            week_number: week,
            challenge_id: week,
            status,
            started_at: status.marks_started().then_some(t1),
            completed_at: (status == VocalStatus::Completed).then_some(t1),
        })
        .await
        .unwrap();
    }

    let weeks = repo.weeks_for_account(account).await.unwrap();
    let numbers: Vec<u32> = weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let rollup = repo.rollup_for_account(account).await.unwrap();
    assert_eq!(rollup.total_challenges, 3);
    assert_eq!(rollup.completed_challenges, 1);
    assert_eq!(rollup.in_progress_challenges, 1);
    assert_eq!(rollup.last_completion, Some(t1));
}

#[tokio::test]
async fn empty_rollup_reads_as_zeros() {
    let repo = connect("memdb_rollup_empty").await;
    let rollup = repo.rollup_for_account(AccountId::new(9)).await.unwrap();
    assert_eq!(rollup.total_challenges, 0);
    assert_eq!(rollup.completed_challenges, 0);
    assert_eq!(rollup.in_progress_challenges, 0);
    assert_eq!(rollup.last_completion, None);
}

#[tokio::test]
async fn open_assignment_is_a_daily_singleton() {
    let repo = connect("memdb_daily_singleton").await;
    let account = AccountId::new(1);

    let first = repo
        .insert_assignment(assignment_record(account, 1, 0))
        .await
        .unwrap();
    assert_eq!(first.status, ChallengeStatus::Pending);

    // A second open assignment for the same day hits the partial unique
    // index.
    let err = repo
        .insert_assignment(assignment_record(account, 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    // Once the open assignment reaches a terminal state the day is free
    // again, matching the pending/in_progress-only rule.
    repo.set_status(first.id, ChallengeStatus::Completed, Some(fixed_now()))
        .await
        .unwrap();
    repo.insert_assignment(assignment_record(account, 1, 0))
        .await
        .expect("terminal state frees the day");

    // Other days and other accounts are unaffected.
    repo.insert_assignment(assignment_record(account, 1, 1))
        .await
        .unwrap();
    repo.insert_assignment(assignment_record(AccountId::new(2), 1, 0))
        .await
        .unwrap();
}

#[tokio::test]
async fn open_assignment_lookup_ignores_terminal_rows() {
    let repo = connect("memdb_open_lookup").await;
    let account = AccountId::new(1);
    let today = fixed_now().date_naive();

    let assignment = repo
        .insert_assignment(assignment_record(account, 1, 0))
        .await
        .unwrap();

    let open = repo.open_assignment_on(account, today).await.unwrap();
    assert_eq!(open.as_ref().map(|a| a.id), Some(assignment.id));

    repo.set_status(assignment.id, ChallengeStatus::Skipped, None)
        .await
        .unwrap();
    let open = repo.open_assignment_on(account, today).await.unwrap();
    assert!(open.is_none());
}

#[tokio::test]
async fn completed_level_tracks_only_completions() {
    let repo = connect("memdb_levels").await;
    let account = AccountId::new(1);

    assert_eq!(repo.highest_completed_level(account).await.unwrap(), None);

    let a1 = repo
        .insert_assignment(assignment_record(account, 1, 0))
        .await
        .unwrap();
    repo.set_status(a1.id, ChallengeStatus::Skipped, None)
        .await
        .unwrap();
    // Skipping never advances the level.
    assert_eq!(repo.highest_completed_level(account).await.unwrap(), None);

    let a2 = repo
        .insert_assignment(assignment_record(account, 2, 1))
        .await
        .unwrap();
    repo.set_status(a2.id, ChallengeStatus::Completed, Some(fixed_now()))
        .await
        .unwrap();
    assert_eq!(repo.highest_completed_level(account).await.unwrap(), Some(2));
}

#[tokio::test]
async fn skip_after_complete_keeps_the_completion_timestamp() {
    let repo = connect("memdb_skip_keeps_ts").await;
    let account = AccountId::new(1);
    let t1 = fixed_now();

    let assignment = repo
        .insert_assignment(assignment_record(account, 1, 0))
        .await
        .unwrap();
    repo.set_status(assignment.id, ChallengeStatus::Completed, Some(t1))
        .await
        .unwrap();
    repo.set_status(assignment.id, ChallengeStatus::Skipped, None)
        .await
        .unwrap();

    let all = repo.list_for_account(account).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, ChallengeStatus::Skipped);
    assert_eq!(all[0].completed_at, Some(t1));
}

#[tokio::test]
async fn listing_orders_by_level_then_newest_date() {
    let repo = connect("memdb_list_order").await;
    let account = AccountId::new(1);

    // Insert out of order across levels and days; close each open
    // assignment so the next day's insert is allowed.
    for (level, day) in [(2_u32, 0_i64), (1, 1), (1, 3), (2, 2)] {
        let a = repo
            .insert_assignment(assignment_record(account, level, day))
            .await
            .unwrap();
        repo.set_status(a.id, ChallengeStatus::Completed, Some(fixed_now()))
            .await
            .unwrap();
    }

    let listed = repo.list_for_account(account).await.unwrap();
    let order: Vec<(u32, i64)> = listed
        .iter()
        .map(|a| {
            (
                a.level,
                (a.assigned_date - fixed_now().date_naive()).num_days(),
            )
        })
        .collect();
    assert_eq!(order, vec![(1, 3), (1, 1), (2, 2), (2, 0)]);
}

#[tokio::test]
async fn updating_an_unknown_assignment_is_a_no_op() {
    let repo = connect("memdb_update_unknown").await;

    repo.set_status(
        coach_core::model::AssignmentId::new(999),
        ChallengeStatus::Completed,
        Some(fixed_now()),
    )
    .await
    .expect("unknown id updates nothing and succeeds");
}

#[tokio::test]
async fn ping_succeeds_on_a_live_database() {
    let repo = connect("memdb_ping").await;
    repo.ping().await.expect("ping");
}
