// src/handlers/quiz.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    catalog::{self, QUIZ_QUESTIONS, QuizQuestion},
    config::Config,
    error::AppError,
    models::{
        quiz_response::AnswerRequest,
        quiz_session::{QuizSession, QuizStage},
    },
    scoring::{QuizSummary, score_quiz},
    store::{self, response_period},
    utils::jwt::{sign_session_token, verify_session_token},
};

/// What the respondent needs to continue: the new token and the next question.
#[derive(Debug, Serialize)]
pub struct SessionStep {
    pub session_token: String,
    pub session_id: String,
    pub stage: QuizStage,
    pub question: Option<&'static QuizQuestion>,
}

fn step(session: &QuizSession, config: &Config) -> Result<SessionStep, AppError> {
    let session_token =
        sign_session_token(session, &config.jwt_secret, config.quiz_session_ttl)?;

    Ok(SessionStep {
        session_token,
        session_id: session.session_id.clone(),
        stage: session.stage,
        question: session.current_question(),
    })
}

/// Lists the quiz questions and their options. Correct answers are not exposed.
pub async fn list_questions() -> impl IntoResponse {
    Json(QUIZ_QUESTIONS)
}

/// Opens a new anonymous session and presents the first question.
pub async fn start_session(State(config): State<Config>) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let session = QuizSession::new(Uuid::new_v4().to_string(), now).start(now)?;

    tracing::info!("Quiz session {} started", session.session_id);

    Ok((StatusCode::CREATED, Json(step(&session, &config)?)))
}

/// Records the answer to the current question and advances the session.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session =
        verify_session_token(&payload.session_token, &config.jwt_secret)?;

    let now = Utc::now();
    let (next, accepted) = session.answer(payload.response.as_deref(), now)?;

    // A retry of an already stored answer (same response) advances like the
    // first attempt did; a different response to the same question is a conflict.
    match store::insert_quiz_response(&pool, &session.session_id, &accepted, now).await {
        Ok(_) => {}
        Err(AppError::Conflict(message)) => {
            let stored =
                store::stored_quiz_response(&pool, &session.session_id, accepted.question_id)
                    .await?;
            if stored.as_deref() != Some(accepted.response.as_str()) {
                return Err(AppError::Conflict(message));
            }
            tracing::info!(
                "Quiz session {} repeated answer to {}",
                session.session_id,
                accepted.question_id
            );
        }
        Err(e) => return Err(e),
    }

    if next.is_completed() {
        tracing::info!("Quiz session {} completed", next.session_id);
    }

    Ok(Json(step(&next, &config)?))
}

#[derive(Debug, Serialize)]
pub struct QuizStatsResponse {
    #[serde(flatten)]
    pub summary: QuizSummary,
    pub first_response: Option<chrono::DateTime<Utc>>,
    pub last_response: Option<chrono::DateTime<Utc>>,
}

/// Per-question accuracy, average response times and overall accuracy.
/// Managers and administrators only.
pub async fn get_stats(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let rows = store::load_quiz_responses(&pool).await?;
    if rows.is_empty() {
        return Err(AppError::NoData("No leadership quiz responses yet".to_string()));
    }

    let summary = score_quiz(&rows, &catalog::answer_key());
    let period = response_period(rows.iter().map(|row| row.timestamp));

    Ok(Json(QuizStatsResponse {
        summary,
        first_response: period.map(|(first, _)| first),
        last_response: period.map(|(_, last)| last),
    }))
}
