//! Integration tests for the poll model layer.
//!
//! Tests cover: transactional creation, the visibility round trip,
//! owner gating on status changes and detail edits, list filters, and
//! the tallies embedded in detail reads.

mod common;

use common::setup_test_db;
use easypoll::errors::AppError;
use easypoll::identity::Viewer;
use easypoll::models::poll::{self, NewPoll, NewQuestion, PollDetailsForm, PollFilter, PollStatus};
use easypoll::models::question::{self, QuestionStatus};
use easypoll::models::{poll_option, vote};

/// Helper: poll input with one published question and the given options.
fn poll_input(title: &str, options: &[&str]) -> NewPoll {
    NewPoll {
        title: title.to_string(),
        description: String::new(),
        end_date: None,
        questions: vec![NewQuestion {
            text: "Where?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            status: QuestionStatus::Published,
        }],
    }
}

fn user(id: &str) -> Viewer {
    Viewer::User(id.to_string())
}

#[tokio::test]
async fn test_create_poll_starts_unpublished() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .expect("create");

    let created = poll::find_by_id(pool, poll_id)
        .await
        .expect("query")
        .expect("poll exists");
    assert_eq!(created.status, PollStatus::Unpublished, "new polls stay hidden");
    assert_eq!(created.owner_user_id, "u1");
    assert_eq!(created.title, "Lunch");
    assert!(!created.created_at.is_empty());
}

#[tokio::test]
async fn test_create_poll_persists_questions_in_order() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let input = NewPoll {
        title: "Team offsite".to_string(),
        description: "Spring planning".to_string(),
        end_date: None,
        questions: vec![
            NewQuestion {
                text: "Which city?".to_string(),
                options: vec!["Oslo".to_string(), "Bergen".to_string()],
                status: QuestionStatus::Published,
            },
            NewQuestion {
                text: "Which month?".to_string(),
                options: vec!["May".to_string(), "June".to_string(), "July".to_string()],
                status: QuestionStatus::Inactive,
            },
        ],
    };
    let poll_id = poll::create(pool, "u1", &input).await.expect("create");

    let questions = question::find_for_poll(pool, poll_id).await.expect("questions");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].position, 0);
    assert_eq!(questions[0].text, "Which city?");
    assert_eq!(questions[0].status, QuestionStatus::Published);
    assert_eq!(questions[1].position, 1);
    assert_eq!(questions[1].status, QuestionStatus::Inactive);

    let options = poll_option::find_for_question(pool, questions[1].id)
        .await
        .expect("options");
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].text, "May");
    assert!(options.iter().all(|o| o.vote_count == 0), "fresh options start at zero");
}

#[tokio::test]
async fn test_visibility_round_trip() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .unwrap();

    // Unpublished: only the owner sees it
    assert!(poll::find_detail(pool, poll_id, &user("u1")).await.is_ok());
    assert!(matches!(
        poll::find_detail(pool, poll_id, &user("u2")).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        poll::find_detail(pool, poll_id, &Viewer::Anonymous).await,
        Err(AppError::NotFound)
    ));

    // Published: everyone sees it
    poll::set_status(pool, poll_id, "u1", PollStatus::Published).await.unwrap();
    assert!(poll::find_detail(pool, poll_id, &user("u2")).await.is_ok());
    assert!(poll::find_detail(pool, poll_id, &Viewer::Anonymous).await.is_ok());

    // Unpublished again: hidden again
    poll::set_status(pool, poll_id, "u1", PollStatus::Unpublished).await.unwrap();
    assert!(matches!(
        poll::find_detail(pool, poll_id, &user("u2")).await,
        Err(AppError::NotFound)
    ));
    assert!(poll::find_detail(pool, poll_id, &user("u1")).await.is_ok());
}

#[tokio::test]
async fn test_set_status_is_owner_gated() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .unwrap();

    // Hidden poll: a non-owner cannot learn it exists
    let err = poll::set_status(pool, poll_id, "u2", PollStatus::Published)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    poll::set_status(pool, poll_id, "u1", PollStatus::Published).await.unwrap();

    // Visible poll: a non-owner is refused outright
    let err = poll::set_status(pool, poll_id, "u2", PollStatus::Inactive)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    // Unknown id
    let err = poll::set_status(pool, 999_999, "u1", PollStatus::Published)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_owner_moves_freely_between_states() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .unwrap();

    let transitions = [
        PollStatus::Published,
        PollStatus::Inactive,
        PollStatus::Published,
        PollStatus::Unpublished,
        PollStatus::Inactive,
        PollStatus::Unpublished,
    ];
    for status in transitions {
        poll::set_status(pool, poll_id, "u1", status).await.expect("transition");
        let current = poll::find_by_id(pool, poll_id).await.unwrap().unwrap();
        assert_eq!(current.status, status);
    }
}

#[tokio::test]
async fn test_detail_filters_questions_by_viewer() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let input = NewPoll {
        title: "Mixed".to_string(),
        description: String::new(),
        end_date: None,
        questions: vec![
            NewQuestion {
                text: "Open?".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                status: QuestionStatus::Published,
            },
            NewQuestion {
                text: "Hidden?".to_string(),
                options: vec!["C".to_string(), "D".to_string()],
                status: QuestionStatus::Inactive,
            },
        ],
    };
    let poll_id = poll::create(pool, "u1", &input).await.unwrap();
    poll::set_status(pool, poll_id, "u1", PollStatus::Published).await.unwrap();

    let for_owner = poll::find_detail(pool, poll_id, &user("u1")).await.unwrap();
    assert_eq!(for_owner.questions.len(), 2, "owner sees every question");

    let for_other = poll::find_detail(pool, poll_id, &user("u2")).await.unwrap();
    assert_eq!(for_other.questions.len(), 1);
    assert_eq!(for_other.questions[0].text, "Open?");

    let for_anon = poll::find_detail(pool, poll_id, &Viewer::Anonymous).await.unwrap();
    assert_eq!(for_anon.questions.len(), 1);
}

#[tokio::test]
async fn test_detail_reports_tallies() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .unwrap();
    poll::set_status(pool, poll_id, "u1", PollStatus::Published).await.unwrap();
    let questions = question::find_for_poll(pool, poll_id).await.unwrap();
    let options = poll_option::find_for_question(pool, questions[0].id).await.unwrap();

    vote::cast(pool, poll_id, questions[0].id, options[0].id, "u2").await.unwrap();
    vote::cast(pool, poll_id, questions[0].id, options[0].id, "u3").await.unwrap();
    vote::cast(pool, poll_id, questions[0].id, options[1].id, "u4").await.unwrap();

    let detail = poll::find_detail(pool, poll_id, &Viewer::Anonymous).await.unwrap();
    let q = &detail.questions[0];
    assert_eq!(q.total_votes, 3);
    assert_eq!(q.options[0].vote_count, 2);
    assert!(q.options[0].leading);
    assert!((q.options[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(q.options[1].vote_count, 1);
    assert!(!q.options[1].leading);
    assert!((q.options[1].percentage - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_list_filters() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let p1 = poll::create(pool, "u1", &poll_input("First", &["A", "B"])).await.unwrap();
    poll::set_status(pool, p1, "u1", PollStatus::Published).await.unwrap();
    let p2 = poll::create(pool, "u1", &poll_input("Draft", &["A", "B"])).await.unwrap();
    let p3 = poll::create(pool, "u2", &poll_input("Third", &["X", "Y"])).await.unwrap();
    poll::set_status(pool, p3, "u2", PollStatus::Published).await.unwrap();

    let published = poll::list(pool, PollFilter::Published, &Viewer::Anonymous).await.unwrap();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].id, p3, "newest first");
    assert_eq!(published[1].id, p1);
    assert_eq!(published[0].question_count, 1);
    assert_eq!(published[0].vote_count, 0);

    let owned = poll::list(pool, PollFilter::Owned, &user("u1")).await.unwrap();
    assert_eq!(owned.len(), 2, "owner list includes drafts");

    let drafts = poll::list(pool, PollFilter::OwnedUnpublished, &user("u1")).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, p2);

    // Owner-scoped filters are empty without a signed-in viewer
    let none = poll::list(pool, PollFilter::Owned, &Viewer::Anonymous).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_active_and_expired() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let mut past = poll_input("Over", &["A", "B"]);
    past.end_date = Some("2020-01-01T00:00:00Z".to_string());
    let p_past = poll::create(pool, "u1", &past).await.unwrap();
    poll::set_status(pool, p_past, "u1", PollStatus::Published).await.unwrap();

    let mut future = poll_input("Running", &["A", "B"]);
    future.end_date = Some("2099-01-01T00:00:00Z".to_string());
    let p_future = poll::create(pool, "u1", &future).await.unwrap();
    poll::set_status(pool, p_future, "u1", PollStatus::Published).await.unwrap();

    let p_open = poll::create(pool, "u1", &poll_input("Open-ended", &["A", "B"])).await.unwrap();
    poll::set_status(pool, p_open, "u1", PollStatus::Published).await.unwrap();

    let active = poll::list(pool, PollFilter::Active, &Viewer::Anonymous).await.unwrap();
    let active_ids: Vec<i64> = active.iter().map(|p| p.id).collect();
    assert_eq!(active.len(), 2);
    assert!(active_ids.contains(&p_future));
    assert!(active_ids.contains(&p_open), "no end date means never expired");

    let expired = poll::list(pool, PollFilter::Expired, &Viewer::Anonymous).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, p_past);
}

#[tokio::test]
async fn test_update_details() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let poll_id = poll::create(pool, "u1", &poll_input("Lunch", &["A", "B"]))
        .await
        .unwrap();

    let form = PollDetailsForm {
        title: "Dinner".to_string(),
        description: "Evening edition".to_string(),
        end_date: Some("2099-06-01T18:00:00Z".to_string()),
    };

    // Hidden poll: non-owner edits read as absent
    let err = poll::update_details(pool, poll_id, "u2", &form).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    poll::update_details(pool, poll_id, "u1", &form).await.expect("owner edit");
    let updated = poll::find_by_id(pool, poll_id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Dinner");
    assert_eq!(updated.description, "Evening edition");
    assert_eq!(updated.end_date.as_deref(), Some("2099-06-01T18:00:00Z"));
    assert_eq!(updated.owner_user_id, "u1", "ownership never changes");
    assert_eq!(updated.status, PollStatus::Unpublished, "edits leave status alone");

    // Visible poll: non-owner edits are refused
    poll::set_status(pool, poll_id, "u1", PollStatus::Published).await.unwrap();
    let err = poll::update_details(pool, poll_id, "u2", &form).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn test_detail_marks_expired() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let mut past = poll_input("Over", &["A", "B"]);
    past.end_date = Some("2020-01-01T00:00:00Z".to_string());
    let p_past = poll::create(pool, "u1", &past).await.unwrap();

    let detail = poll::find_detail(pool, p_past, &user("u1")).await.unwrap();
    assert!(detail.expired);

    let p_open = poll::create(pool, "u1", &poll_input("Open", &["A", "B"])).await.unwrap();
    let detail = poll::find_detail(pool, p_open, &user("u1")).await.unwrap();
    assert!(!detail.expired);
}
