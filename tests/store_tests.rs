// tests/store_tests.rs

use chrono::{Duration, Utc};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use survey_backend::{
    db,
    models::{practice_response::SubmitPracticeRequest, quiz_session::QuizSession},
    store,
};

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

fn submission(score: u8) -> SubmitPracticeRequest {
    serde_json::from_value(serde_json::json!({
        "a1": score, "a2": score, "b1": score, "b2": score, "c1": score, "c2": score,
        "d1": score, "d2": score, "e1": score, "e2": score, "f1": score, "f2": score,
        "g1": score, "g2": score,
        "comment": "  needs work  "
    }))
    .unwrap()
}

async fn store_one_answer(pool: &SqlitePool, session_id: &str) {
    let now = Utc::now();
    let session = QuizSession::new(session_id, now).start(now).unwrap();
    let (_, accepted) = session
        .answer(Some("b"), now + Duration::milliseconds(1500))
        .unwrap();
    store::insert_quiz_response(pool, &session.session_id, &accepted, now)
        .await
        .unwrap();
}

#[tokio::test]
async fn practice_rows_round_trip_with_trimmed_comment() {
    let pool = test_pool().await;

    store::insert_practice_response(&pool, &submission(3), Utc::now())
        .await
        .unwrap();

    let rows = store::load_practice_responses(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_scores(), [3; 14]);
    assert_eq!(rows[0].comment.as_deref(), Some("needs work"));
}

#[tokio::test]
async fn quiz_answer_stores_response_time() {
    let pool = test_pool().await;
    store_one_answer(&pool, "session-1").await;

    let rows = store::load_quiz_responses(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question_id, "q1");
    assert_eq!(rows[0].response, "b");
    assert!((rows[0].response_time - 1.5).abs() < 1e-9);
}

#[tokio::test]
async fn database_rejects_out_of_range_scores() {
    let pool = test_pool().await;

    let result = sqlx::query(
        r#"
        INSERT INTO practice_responses
        (timestamp, a1, a2, b1, b2, c1, c2, d1, d2, e1, e2, f1, f2, g1, g2)
        VALUES (?, 9, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1)
        "#,
    )
    .bind(Utc::now())
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn reset_clears_both_tables() {
    let pool = test_pool().await;
    store::insert_practice_response(&pool, &submission(5), Utc::now())
        .await
        .unwrap();
    store_one_answer(&pool, "session-1").await;
    store_one_answer(&pool, "session-2").await;

    let outcome = store::reset_responses(&pool).await.unwrap();
    assert_eq!(outcome.practice_responses_deleted, 1);
    assert_eq!(outcome.quiz_responses_deleted, 2);

    let summary = store::database_summary(&pool).await.unwrap();
    assert_eq!(summary.practice_responses.count, 0);
    assert_eq!(summary.quiz_responses.count, 0);
}

#[tokio::test]
async fn failed_reset_leaves_everything_in_place() {
    let pool = test_pool().await;
    store::insert_practice_response(&pool, &submission(5), Utc::now())
        .await
        .unwrap();
    store_one_answer(&pool, "session-1").await;

    // Make the second delete fail after the first one has run.
    sqlx::query(
        r#"
        CREATE TRIGGER fail_quiz_delete BEFORE DELETE ON quiz_responses
        BEGIN
            SELECT RAISE(ABORT, 'quiz delete refused');
        END
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    assert!(store::reset_responses(&pool).await.is_err());

    let summary = store::database_summary(&pool).await.unwrap();
    assert_eq!(summary.practice_responses.count, 1);
    assert_eq!(summary.quiz_responses.count, 1);
}
