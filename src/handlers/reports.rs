// src/handlers/reports.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    catalog,
    error::AppError,
    report::{
        HPO_REPORT_FILENAME, LEADERSHIP_REPORT_FILENAME, render_practice_report,
        render_quiz_report,
    },
    scoring::{score_practices, score_quiz},
    store,
};

fn html_attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Downloads the practices report as `hpo-report.html`.
pub async fn hpo_report(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = store::load_practice_responses(&pool).await?;
    let summary = score_practices(&rows)
        .ok_or_else(|| AppError::NoData("No practice survey responses to report".to_string()))?;

    let html = render_practice_report(&summary, &rows, Utc::now());
    Ok(html_attachment(HPO_REPORT_FILENAME, html))
}

/// Downloads the quiz report as `leadership-report.html`.
pub async fn leadership_report(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let rows = store::load_quiz_responses(&pool).await?;
    if rows.is_empty() {
        return Err(AppError::NoData(
            "No leadership quiz responses to report".to_string(),
        ));
    }

    let summary = score_quiz(&rows, &catalog::answer_key());
    let html = render_quiz_report(&summary, &rows, Utc::now());
    Ok(html_attachment(LEADERSHIP_REPORT_FILENAME, html))
}
