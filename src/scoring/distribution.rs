// src/scoring/distribution.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::practice_response::PracticeResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreFrequency {
    pub score: i64,
    pub count: usize,
}

/// Counts every item score (all 14 columns of every row), sorted by score.
/// Scores that never occur are left out.
pub fn score_distribution(rows: &[PracticeResponse]) -> Vec<ScoreFrequency> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for score in rows.iter().flat_map(|row| row.item_scores()) {
        *counts.entry(score).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(score, count)| ScoreFrequency { score, count })
        .collect()
}
