//! Weighted rubric criteria and the overall score derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::{AnswerScore, ScoreError};

/// Tolerance when checking that weights add up to 100.
const WEIGHT_EPSILON: f64 = 0.01;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RubricError {
    #[error("expected {expected} criteria, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("criterion weights must sum to 100, got {0}")]
    WeightsNotNormalized(f64),

    #[error("criterion {index} has score {score}, expected 0..=100")]
    ScoreOutOfRange { index: usize, score: f64 },

    #[error("criterion {index} has empty feedback")]
    EmptyFeedback { index: usize },

    #[error("criterion {index} has weight {actual}, expected {expected}")]
    WeightMismatch {
        index: usize,
        expected: f64,
        actual: f64,
    },

    #[error("no score for criterion `{0}`")]
    MissingCriterion(String),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Score and feedback for one rubric criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion_name: String,
    pub score: f64,
    pub feedback: String,
    pub weight: f64,
}

impl CriterionScore {
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64, feedback: impl Into<String>, weight: f64) -> Self {
        Self {
            criterion_name: name.into(),
            score,
            feedback: feedback.into(),
            weight,
        }
    }

    /// Placeholder rows, one per weight, with zero scores.
    #[must_use]
    pub fn empty_for(weights: &[f64]) -> Vec<Self> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| Self::new(format!("Criterion {}", i + 1), 0.0, "", *w))
            .collect()
    }
}

/// Checks criteria against the rubric weights they were graded with.
///
/// # Errors
///
/// Returns the first `RubricError` found, checking counts, then weight sum,
/// then each criterion in order.
#[allow(clippy::float_cmp)]
pub fn validate_criteria(criteria: &[CriterionScore], weights: &[f64]) -> Result<(), RubricError> {
    if criteria.len() != weights.len() {
        return Err(RubricError::CountMismatch {
            expected: weights.len(),
            actual: criteria.len(),
        });
    }

    let total: f64 = weights.iter().sum();
    if (total - 100.0).abs() > WEIGHT_EPSILON {
        return Err(RubricError::WeightsNotNormalized(total));
    }

    for (index, (criterion, weight)) in criteria.iter().zip(weights).enumerate() {
        if !(0.0..=100.0).contains(&criterion.score) {
            return Err(RubricError::ScoreOutOfRange {
                index,
                score: criterion.score,
            });
        }
        if criterion.feedback.is_empty() {
            return Err(RubricError::EmptyFeedback { index });
        }
        if criterion.weight != *weight {
            return Err(RubricError::WeightMismatch {
                index,
                expected: *weight,
                actual: criterion.weight,
            });
        }
    }

    Ok(())
}

/// Weighted overall score, rounded to the nearest whole point.
///
/// # Errors
///
/// Returns `RubricError::Score` if the weighted sum falls outside `0..=100`,
/// which only happens when the criteria were not validated first.
pub fn overall_score(criteria: &[CriterionScore]) -> Result<AnswerScore, RubricError> {
    let weighted: f64 = criteria.iter().map(|c| c.score * c.weight / 100.0).sum();
    Ok(AnswerScore::from_f64(weighted.round())?)
}
