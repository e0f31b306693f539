// src/store.rs

//! Reads and writes of the two response tables.
//! Rows are inserted one at a time and read back as full snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::{
    error::{AppError, conflict_on_unique},
    models::{
        practice_response::{PracticeResponse, SubmitPracticeRequest},
        quiz_response::QuizResponse,
        quiz_session::AcceptedAnswer,
    },
};

/// Row count and response period of one table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TableSummary {
    pub count: i64,
    pub first_response: Option<String>,
    pub last_response: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub practice_responses: TableSummary,
    pub quiz_responses: TableSummary,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResetOutcome {
    pub practice_responses_deleted: u64,
    pub quiz_responses_deleted: u64,
}

pub async fn insert_practice_response(
    pool: &SqlitePool,
    submission: &SubmitPracticeRequest,
    submitted_at: DateTime<Utc>,
) -> Result<i64, AppError> {
    let comment = submission
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut query = sqlx::query(
        r#"
        INSERT INTO practice_responses
        (timestamp, a1, a2, b1, b2, c1, c2, d1, d2, e1, e2, f1, f2, g1, g2, comment)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(submitted_at);

    for score in submission.item_scores() {
        query = query.bind(i64::from(score));
    }

    let result = query.bind(comment).execute(pool).await.map_err(|e| {
        tracing::error!("Failed to insert practice response: {:?}", e);
        AppError::from(e)
    })?;

    Ok(result.last_insert_rowid())
}

pub async fn load_practice_responses(pool: &SqlitePool) -> Result<Vec<PracticeResponse>, AppError> {
    let rows = sqlx::query_as::<_, PracticeResponse>(
        r#"
        SELECT id, timestamp, a1, a2, b1, b2, c1, c2, d1, d2, e1, e2, f1, f2, g1, g2, comment
        FROM practice_responses
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load practice responses: {:?}", e);
        AppError::from(e)
    })?;

    Ok(rows)
}

/// Stores one quiz answer. A second answer to the same question of the same
/// session is a conflict and leaves the table unchanged.
pub async fn insert_quiz_response(
    pool: &SqlitePool,
    session_id: &str,
    answer: &AcceptedAnswer,
    answered_at: DateTime<Utc>,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO quiz_responses (session_id, timestamp, question_id, response, response_time)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(session_id)
    .bind(answered_at)
    .bind(answer.question_id)
    .bind(&answer.response)
    .bind(answer.response_time)
    .execute(pool)
    .await
    .map_err(|e| {
        conflict_on_unique(
            e,
            format!("Question {} was already answered in this session", answer.question_id),
        )
    })?;

    Ok(result.last_insert_rowid())
}

/// The stored response of one session to one question, if any.
pub async fn stored_quiz_response(
    pool: &SqlitePool,
    session_id: &str,
    question_id: &str,
) -> Result<Option<String>, AppError> {
    let response: Option<String> = sqlx::query_scalar(
        r#"
        SELECT response
        FROM quiz_responses
        WHERE session_id = ? AND question_id = ?
        "#,
    )
    .bind(session_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await?;

    Ok(response)
}

pub async fn load_quiz_responses(pool: &SqlitePool) -> Result<Vec<QuizResponse>, AppError> {
    let rows = sqlx::query_as::<_, QuizResponse>(
        r#"
        SELECT id, session_id, timestamp, question_id, response, response_time
        FROM quiz_responses
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load quiz responses: {:?}", e);
        AppError::from(e)
    })?;

    Ok(rows)
}

/// Deletes every practice and quiz response in one transaction.
/// If either delete fails, neither table is changed.
pub async fn reset_responses(pool: &SqlitePool) -> Result<ResetOutcome, AppError> {
    let mut tx = pool.begin().await?;

    let practice = sqlx::query("DELETE FROM practice_responses")
        .execute(&mut *tx)
        .await?;

    let quiz = sqlx::query("DELETE FROM quiz_responses")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(ResetOutcome {
        practice_responses_deleted: practice.rows_affected(),
        quiz_responses_deleted: quiz.rows_affected(),
    })
}

async fn table_summary(pool: &SqlitePool, sql: &str) -> Result<TableSummary, AppError> {
    Ok(sqlx::query_as::<_, TableSummary>(sql).fetch_one(pool).await?)
}

pub async fn database_summary(pool: &SqlitePool) -> Result<DatabaseSummary, AppError> {
    let practice_responses = table_summary(
        pool,
        r#"
        SELECT COUNT(*) AS count,
               MIN(timestamp) AS first_response,
               MAX(timestamp) AS last_response
        FROM practice_responses
        "#,
    )
    .await?;

    let quiz_responses = table_summary(
        pool,
        r#"
        SELECT COUNT(*) AS count,
               MIN(timestamp) AS first_response,
               MAX(timestamp) AS last_response
        FROM quiz_responses
        "#,
    )
    .await?;

    Ok(DatabaseSummary {
        practice_responses,
        quiz_responses,
    })
}

/// Earliest and latest timestamp of a snapshot.
pub fn response_period<I>(timestamps: I) -> Option<(DateTime<Utc>, DateTime<Utc>)>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    timestamps.into_iter().fold(None, |period, ts| match period {
        None => Some((ts, ts)),
        Some((first, last)) => Some((first.min(ts), last.max(ts))),
    })
}
