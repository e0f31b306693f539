// src/models/practice_response.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'practice_responses' table in the database.
/// One row per completed practices survey.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PracticeResponse {
    pub id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub a1: i64,
    pub a2: i64,
    pub b1: i64,
    pub b2: i64,
    pub c1: i64,
    pub c2: i64,
    pub d1: i64,
    pub d2: i64,
    pub e1: i64,
    pub e2: i64,
    pub f1: i64,
    pub f2: i64,
    pub g1: i64,
    pub g2: i64,
    pub comment: Option<String>,
}

impl PracticeResponse {
    /// The 14 item scores in column order (a1, a2, b1, ... g2).
    pub fn item_scores(&self) -> [i64; 14] {
        [
            self.a1, self.a2, self.b1, self.b2, self.c1, self.c2, self.d1, self.d2, self.e1,
            self.e2, self.f1, self.f2, self.g1, self.g2,
        ]
    }

    /// The comment, if it carries any text.
    pub fn non_empty_comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// DTO for submitting the practices survey.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitPracticeRequest {
    #[validate(range(min = 1, max = 7))]
    pub a1: u8,
    #[validate(range(min = 1, max = 7))]
    pub a2: u8,
    #[validate(range(min = 1, max = 7))]
    pub b1: u8,
    #[validate(range(min = 1, max = 7))]
    pub b2: u8,
    #[validate(range(min = 1, max = 7))]
    pub c1: u8,
    #[validate(range(min = 1, max = 7))]
    pub c2: u8,
    #[validate(range(min = 1, max = 7))]
    pub d1: u8,
    #[validate(range(min = 1, max = 7))]
    pub d2: u8,
    #[validate(range(min = 1, max = 7))]
    pub e1: u8,
    #[validate(range(min = 1, max = 7))]
    pub e2: u8,
    #[validate(range(min = 1, max = 7))]
    pub f1: u8,
    #[validate(range(min = 1, max = 7))]
    pub f2: u8,
    #[validate(range(min = 1, max = 7))]
    pub g1: u8,
    #[validate(range(min = 1, max = 7))]
    pub g2: u8,

    /// Optional free-text comment.
    #[validate(length(max = 5000, message = "Comment must be at most 5000 characters"))]
    #[serde(default)]
    pub comment: Option<String>,
}

impl SubmitPracticeRequest {
    /// The 14 item scores in column order.
    pub fn item_scores(&self) -> [u8; 14] {
        [
            self.a1, self.a2, self.b1, self.b2, self.c1, self.c2, self.d1, self.d2, self.e1,
            self.e2, self.f1, self.f2, self.g1, self.g2,
        ]
    }
}
