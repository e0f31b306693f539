// src/scoring/mod.rs

//! Aggregation engine: turns stored survey and quiz rows into dimension
//! scores, classifications, distributions and accuracy figures.
//!
//! Everything here is a pure reduction over a full table snapshot, so the
//! result does not depend on row order.

pub mod distribution;
pub mod practices;
pub mod quiz;

use serde::Serialize;

use crate::config::{HIGH_PERFORMANCE_THRESHOLD, MEDIUM_PERFORMANCE_THRESHOLD};

pub use distribution::{ScoreFrequency, score_distribution};
pub use practices::{DimensionScore, PracticeSummary, score_practices};
pub use quiz::{QuestionScore, QuizSummary, score_quiz};

/// Performance band of a mean dimension score (range 2-14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    #[serde(rename = "High performance")]
    HighPerformance,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Improvement opportunity")]
    ImprovementOpportunity,
}

impl Classification {
    /// `>= 12` high, `[9, 12)` medium, below 9 improvement opportunity.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= HIGH_PERFORMANCE_THRESHOLD {
            Classification::HighPerformance
        } else if mean >= MEDIUM_PERFORMANCE_THRESHOLD {
            Classification::Medium
        } else {
            Classification::ImprovementOpportunity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::HighPerformance => "High performance",
            Classification::Medium => "Medium",
            Classification::ImprovementOpportunity => "Improvement opportunity",
        }
    }

    /// Style class used by the HTML reports.
    pub fn css_class(&self) -> &'static str {
        match self {
            Classification::HighPerformance => "good",
            Classification::Medium => "medium",
            Classification::ImprovementOpportunity => "poor",
        }
    }
}
