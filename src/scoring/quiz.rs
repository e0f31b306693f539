// src/scoring/quiz.rs

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    catalog::{self, AnswerKey},
    models::quiz_response::QuizResponse,
};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionScore {
    pub question_id: &'static str,
    pub prompt: &'static str,
    pub correct: usize,
    pub total: usize,
    /// Percentage of correct answers, 0 when the question has no answers.
    pub accuracy: f64,
    /// Mean response time in seconds; `None` when the question has no answers.
    pub average_response_time: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub questions: Vec<QuestionScore>,
    /// `total_correct / (answers / questions) * 100`. A single perfect
    /// session scores `questions * 100`; the scale is kept as reported historically.
    pub overall_accuracy: f64,
    pub response_count: usize,
    pub session_count: usize,
    pub completed_sessions: usize,
}

#[derive(Default)]
struct Tally {
    correct: usize,
    total: usize,
    time_sum: f64,
}

/// Scores every question in `key` over the full set of quiz rows.
///
/// Overall accuracy is `total_correct / (answered_rows / questions) * 100`,
/// i.e. it assumes every session answered every question. Partial sessions
/// are not corrected for; `completed_sessions` lets callers spot them.
pub fn score_quiz(rows: &[QuizResponse], key: &[AnswerKey]) -> QuizSummary {
    let mut tallies: HashMap<&str, Tally> = key
        .iter()
        .map(|k| (k.question_id, Tally::default()))
        .collect();
    let correct_by_question: HashMap<&str, &str> =
        key.iter().map(|k| (k.question_id, k.correct)).collect();

    let mut answered_by_session: HashMap<&str, HashSet<&str>> = HashMap::new();

    for row in rows {
        answered_by_session
            .entry(row.session_id.as_str())
            .or_default()
            .insert(row.question_id.as_str());

        if let Some(tally) = tallies.get_mut(row.question_id.as_str()) {
            tally.total += 1;
            tally.time_sum += row.response_time;
            if correct_by_question.get(row.question_id.as_str()) == Some(&row.response.as_str()) {
                tally.correct += 1;
            }
        }
    }

    let questions: Vec<QuestionScore> = key
        .iter()
        .map(|k| {
            let tally = tallies.remove(k.question_id).unwrap_or_default();
            let (accuracy, average_response_time) = if tally.total > 0 {
                (
                    tally.correct as f64 / tally.total as f64 * 100.0,
                    Some(tally.time_sum / tally.total as f64),
                )
            } else {
                (0.0, None)
            };

            QuestionScore {
                question_id: k.question_id,
                prompt: catalog::question_prompt(k.question_id).unwrap_or(k.question_id),
                correct: tally.correct,
                total: tally.total,
                accuracy,
                average_response_time,
            }
        })
        .collect();

    let total_correct: usize = questions.iter().map(|q| q.correct).sum();
    let total_answers: usize = questions.iter().map(|q| q.total).sum();

    let overall_accuracy = if total_answers > 0 && !key.is_empty() {
        let respondents = total_answers as f64 / key.len() as f64;
        total_correct as f64 / respondents * 100.0
    } else {
        0.0
    };

    let completed_sessions = answered_by_session
        .values()
        .filter(|answered| key.iter().all(|k| answered.contains(k.question_id)))
        .count();

    QuizSummary {
        questions,
        overall_accuracy,
        response_count: rows.len(),
        session_count: answered_by_session.len(),
        completed_sessions,
    }
}
