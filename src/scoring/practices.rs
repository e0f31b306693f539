// src/scoring/practices.rs

use serde::Serialize;

use super::Classification;
use crate::{
    catalog::{DIMENSION_COUNT, DIMENSIONS},
    models::practice_response::PracticeResponse,
};

/// Mean score of one dimension across all submissions.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionScore {
    pub key: &'static str,
    pub title: &'static str,
    /// Mean of the per-row dimension totals, in [2, 14].
    pub mean: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeSummary {
    pub dimensions: Vec<DimensionScore>,
    /// Mean of the seven dimension means.
    pub overall_mean: f64,
    pub overall_classification: Classification,
    pub response_count: usize,
}

/// Scores every dimension over the full set of survey rows.
///
/// Returns `None` for an empty set: there is no mean to report, and callers
/// must show "no data" rather than a zero score.
pub fn score_practices(rows: &[PracticeResponse]) -> Option<PracticeSummary> {
    if rows.is_empty() {
        return None;
    }

    let count = rows.len() as f64;
    let mut totals = [0i64; DIMENSION_COUNT];

    for row in rows {
        let items = row.item_scores();
        for (idx, total) in totals.iter_mut().enumerate() {
            *total += items[2 * idx] + items[2 * idx + 1];
        }
    }

    let dimensions: Vec<DimensionScore> = DIMENSIONS
        .iter()
        .zip(totals)
        .map(|(dimension, total)| {
            let mean = total as f64 / count;
            DimensionScore {
                key: dimension.key,
                title: dimension.title,
                mean,
                classification: Classification::from_mean(mean),
            }
        })
        .collect();

    // Mean of the dimension means, taken from the integer totals so that an
    // exact 12 or 9 stays exact.
    let overall_mean =
        totals.iter().sum::<i64>() as f64 / (DIMENSION_COUNT as f64 * count);

    Some(PracticeSummary {
        dimensions,
        overall_mean,
        overall_classification: Classification::from_mean(overall_mean),
        response_count: rows.len(),
    })
}
