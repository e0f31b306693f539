// src/handlers/practices.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    catalog::{DIMENSIONS, SCALE_LABELS},
    error::AppError,
    models::practice_response::SubmitPracticeRequest,
    scoring::{PracticeSummary, ScoreFrequency, score_distribution, score_practices},
    store::{self, response_period},
};

#[derive(Debug, Serialize)]
pub struct CommentEntry {
    pub timestamp: DateTime<Utc>,
    pub comment: String,
}

/// Everything a manager sees about the practices survey.
#[derive(Debug, Serialize)]
pub struct PracticeStatsResponse {
    #[serde(flatten)]
    pub summary: PracticeSummary,
    pub distribution: Vec<ScoreFrequency>,
    pub comments: Vec<CommentEntry>,
    pub first_response: Option<DateTime<Utc>>,
    pub last_response: Option<DateTime<Utc>>,
}

/// Returns the survey form: dimensions, their statements and the 1-7 scale.
pub async fn get_questionnaire() -> impl IntoResponse {
    let scale: Vec<_> = SCALE_LABELS
        .iter()
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect();

    Json(json!({
        "dimensions": DIMENSIONS,
        "scale": scale,
    }))
}

/// Stores one completed practices survey.
/// Open to anonymous workers.
pub async fn submit_response(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SubmitPracticeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = store::insert_practice_response(&pool, &payload, Utc::now()).await?;
    tracing::info!("Practice response {} stored", id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Survey submitted successfully. Thank you for taking part."
        })),
    ))
}

/// Dimension scores, classifications, score distribution and comments.
/// Managers and administrators only.
pub async fn get_stats(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let rows = store::load_practice_responses(&pool).await?;

    let summary = score_practices(&rows)
        .ok_or_else(|| AppError::NoData("No practice survey responses yet".to_string()))?;

    let comments = rows
        .iter()
        .filter_map(|row| {
            row.non_empty_comment().map(|comment| CommentEntry {
                timestamp: row.timestamp,
                comment: comment.to_string(),
            })
        })
        .collect();

    let period = response_period(rows.iter().map(|row| row.timestamp));

    Ok(Json(PracticeStatsResponse {
        summary,
        distribution: score_distribution(&rows),
        comments,
        first_response: period.map(|(first, _)| first),
        last_response: period.map(|(_, last)| last),
    }))
}
