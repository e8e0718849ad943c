use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use prep_core::rubric::{CriterionScore, RubricError, overall_score, validate_criteria};
use prep_core::scoring::{AnswerLevel, AnswerScore, SetQuestionStatus, ZeroScore, is_successful};

use crate::error::FeedbackError;

/// Assessment must be this many sentences.
const ASSESSMENT_SENTENCES: std::ops::RangeInclusive<usize> = 1..=2;

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// Raw grader payload; only field presence and primitive types are checked here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackPayload {
    score: f64,
    level: String,
    assessment: String,
    core_feedback: String,
    detailed_feedback: String,
    rubric_scores: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RubricPayload {
    score: f64,
    feedback: String,
}

//
// ─── VALIDATED FEEDBACK ────────────────────────────────────────────────────────
//

/// Per-criterion grade inside a feedback payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricScore {
    pub score: f64,
    pub feedback: String,
}

/// Grader feedback that passed every validation stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedFeedback {
    pub score: AnswerScore,
    pub level: AnswerLevel,
    pub assessment: String,
    pub core_feedback: String,
    pub detailed_feedback: String,
    pub rubric_scores: BTreeMap<String, RubricScore>,
}

impl GradedFeedback {
    /// Coarse outcome recorded in the practice set.
    #[must_use]
    pub fn status(&self) -> SetQuestionStatus {
        SetQuestionStatus::from_score(self.score)
    }

    #[must_use]
    pub fn is_successful(&self) -> bool {
        is_successful(self.score)
    }

    /// Weighted score over the graded criteria.
    ///
    /// `rubric` lists each criterion name with its weight; the weights must
    /// add up to 100 and every criterion must have been graded, no more.
    ///
    /// # Errors
    ///
    /// Returns `RubricError::CountMismatch` when the grader scored a different
    /// number of criteria, `RubricError::MissingCriterion` for an ungraded one,
    /// and any error from [`validate_criteria`].
    pub fn rubric_score(&self, rubric: &[(&str, f64)]) -> Result<AnswerScore, RubricError> {
        if rubric.len() != self.rubric_scores.len() {
            return Err(RubricError::CountMismatch {
                expected: rubric.len(),
                actual: self.rubric_scores.len(),
            });
        }

        let criteria = rubric
            .iter()
            .map(|&(name, weight)| {
                self.rubric_scores
                    .get(name)
                    .map(|entry| {
                        CriterionScore::new(name, entry.score, entry.feedback.clone(), weight)
                    })
                    .ok_or_else(|| RubricError::MissingCriterion(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let weights: Vec<f64> = rubric.iter().map(|&(_, weight)| weight).collect();
        validate_criteria(&criteria, &weights)?;
        overall_score(&criteria)
    }

    /// How the grader read a zero score, taken from its own label.
    #[must_use]
    pub fn zero_score(&self) -> ZeroScore {
        match self.level {
            AnswerLevel::Irrelevant => ZeroScore::Irrelevant,
            _ => ZeroScore::NoUnderstanding,
        }
    }
}

//
// ─── VALIDATOR ─────────────────────────────────────────────────────────────────
//

/// Checks grader output before the engine trusts it.
///
/// Stages run in order and stop at the first failure: structure, score range,
/// level name, score/level consistency, assessment length, rubric entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackValidator;

impl FeedbackValidator {
    /// Validate a parsed payload.
    ///
    /// # Errors
    ///
    /// Returns the `FeedbackError` of the first failing stage.
    pub fn check(raw: &Value) -> Result<GradedFeedback, FeedbackError> {
        if !raw.is_object() {
            return Err(FeedbackError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(raw)
            )));
        }
        let payload = FeedbackPayload::deserialize(raw)
            .map_err(|e| FeedbackError::Malformed(e.to_string()))?;

        let score = AnswerScore::from_f64(payload.score).map_err(FeedbackError::Score)?;

        let level: AnswerLevel = payload
            .level
            .parse()
            .map_err(|_| FeedbackError::UnknownLevel(payload.level.clone()))?;

        if !level.accepts(score) {
            let range = level.score_range();
            return Err(FeedbackError::LevelMismatch {
                score: score.value(),
                level,
                min: *range.start(),
                max: *range.end(),
            });
        }

        let sentences = sentence_count(&payload.assessment);
        if !ASSESSMENT_SENTENCES.contains(&sentences) {
            return Err(FeedbackError::AssessmentLength(sentences));
        }

        let rubric_scores = payload
            .rubric_scores
            .into_iter()
            .map(|(criterion, entry)| {
                let parsed = rubric_entry(&criterion, entry)?;
                Ok((criterion, parsed))
            })
            .collect::<Result<BTreeMap<_, _>, FeedbackError>>()?;

        Ok(GradedFeedback {
            score,
            level,
            assessment: payload.assessment,
            core_feedback: payload.core_feedback,
            detailed_feedback: payload.detailed_feedback,
            rubric_scores,
        })
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Malformed` for invalid JSON, otherwise as
    /// [`FeedbackValidator::check`].
    pub fn check_json(raw: &str) -> Result<GradedFeedback, FeedbackError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| FeedbackError::Malformed(e.to_string()))?;
        Self::check(&value)
    }

    /// True when `raw` passes every stage; failures are logged, never raised.
    #[must_use]
    pub fn validate(raw: &Value) -> bool {
        match Self::check(raw) {
            Ok(_) => true,
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "rejected grader feedback");
                false
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Non-blank pieces between runs of `.`, `!` and `?`.
fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|piece| !piece.trim().is_empty())
        .count()
}

fn rubric_entry(criterion: &str, entry: Value) -> Result<RubricScore, FeedbackError> {
    let invalid = |reason: String| FeedbackError::InvalidRubricEntry {
        criterion: criterion.to_string(),
        reason,
    };

    if !entry.is_object() {
        return Err(invalid(format!(
            "expected an object with score and feedback, got {}",
            json_kind(&entry)
        )));
    }
    let RubricPayload { score, feedback } =
        RubricPayload::deserialize(entry).map_err(|e| invalid(e.to_string()))?;

    if !(0.0..=100.0).contains(&score) {
        return Err(invalid(format!("score {score} is outside 0..=100")));
    }
    if feedback.trim().is_empty() {
        return Err(invalid("feedback is empty".into()));
    }

    Ok(RubricScore { score, feedback })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
