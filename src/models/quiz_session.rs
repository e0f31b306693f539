// src/models/quiz_session.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, QuizQuestion},
    config::QUIZ_QUESTION_COUNT,
    error::AppError,
};

/// Where a respondent is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "question", rename_all = "snake_case")]
pub enum QuizStage {
    NotStarted,
    /// 1-based position of the question awaiting an answer.
    Answering(usize),
    Completed,
}

/// Explicit per-respondent quiz state.
///
/// The server keeps no session table: this record travels inside a signed
/// token, goes in with every answer and comes back advanced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub session_id: String,
    pub stage: QuizStage,
    /// When the current question was presented.
    pub presented_at: DateTime<Utc>,
}

/// An answer accepted by the state machine, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedAnswer {
    pub question_id: &'static str,
    pub response: String,
    pub response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotStarted,
    AlreadyStarted,
    AlreadyCompleted,
    InvalidStage(usize),
    MissingResponse,
    InvalidOption(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotStarted => write!(f, "Quiz session has not been started"),
            SessionError::AlreadyStarted => write!(f, "Quiz session was already started"),
            SessionError::AlreadyCompleted => {
                write!(f, "Quiz session is already completed; start a new session")
            }
            SessionError::InvalidStage(position) => {
                write!(f, "Quiz session points at unknown question {}", position)
            }
            SessionError::MissingResponse => {
                write!(f, "Please select an option before submitting")
            }
            SessionError::InvalidOption(option) => write!(f, "Invalid option '{}'", option),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl QuizSession {
    pub fn new(session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            stage: QuizStage::NotStarted,
            presented_at: now,
        }
    }

    /// NotStarted -> Answering(1). The first response time counts from `now`.
    pub fn start(self, now: DateTime<Utc>) -> Result<Self, SessionError> {
        match self.stage {
            QuizStage::NotStarted => Ok(Self {
                stage: QuizStage::Answering(1),
                presented_at: now,
                ..self
            }),
            QuizStage::Completed => Err(SessionError::AlreadyCompleted),
            QuizStage::Answering(_) => Err(SessionError::AlreadyStarted),
        }
    }

    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        match self.stage {
            QuizStage::Answering(position) => catalog::quiz_question(position),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.stage == QuizStage::Completed
    }

    /// Accepts an answer to the current question and returns the advanced state.
    /// On error the session is unchanged.
    pub fn answer(
        &self,
        response: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(QuizSession, AcceptedAnswer), SessionError> {
        let position = match self.stage {
            QuizStage::NotStarted => return Err(SessionError::NotStarted),
            QuizStage::Completed => return Err(SessionError::AlreadyCompleted),
            QuizStage::Answering(position) => position,
        };

        let question =
            catalog::quiz_question(position).ok_or(SessionError::InvalidStage(position))?;

        let response = response
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(SessionError::MissingResponse)?;

        if !question.has_option(response) {
            return Err(SessionError::InvalidOption(response.to_string()));
        }

        let elapsed_ms = (now - self.presented_at).num_milliseconds().max(0);
        let accepted = AcceptedAnswer {
            question_id: question.id,
            response: response.to_string(),
            response_time: elapsed_ms as f64 / 1000.0,
        };

        let next_stage = if position >= QUIZ_QUESTION_COUNT {
            QuizStage::Completed
        } else {
            QuizStage::Answering(position + 1)
        };

        let next = QuizSession {
            session_id: self.session_id.clone(),
            stage: next_stage,
            presented_at: now,
        };

        Ok((next, accepted))
    }
}
