// src/models/quiz_response.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'quiz_responses' table in the database.
/// One row per (session, question) pair.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResponse {
    pub id: i64,
    pub session_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub question_id: String,
    pub response: String,
    /// Seconds since the question was presented.
    pub response_time: f64,
}

/// DTO for answering the current quiz question.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// The token returned by the previous step of the session.
    pub session_token: String,

    /// Selected option key; `None` when the respondent left the question unanswered.
    pub response: Option<String>,
}
