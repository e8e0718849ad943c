//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use prep_core::scoring::{AnswerLevel, ScoreError};

pub use prep_core::model::ProgressError;

/// Errors emitted by `QuestionSelector`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectorError {
    #[error("topic selection is empty")]
    EmptySelection,

    #[error("exam {exam} allows no question types")]
    NoQuestionTypes { exam: String },

    /// The selection names a subtopic the exam tree does not contain.
    #[error("could not find parent topic for subtopic {subtopic}")]
    ParentTopicNotFound { subtopic: String },

    #[error(
        "no question satisfies the active filter after {attempts} attempts; relax the filter and try again"
    )]
    Unsatisfiable { attempts: usize },
}

impl SelectorError {
    /// True for failures the caller can fix by changing the filter.
    ///
    /// Everything else is a configuration defect and retrying will not help.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SelectorError::Unsatisfiable { .. })
    }
}

/// Validation stage a feedback payload failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStage {
    Structure,
    Range,
    Level,
    Consistency,
    Assessment,
    Rubric,
}

impl fmt::Display for FeedbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackStage::Structure => "structure",
            FeedbackStage::Range => "range",
            FeedbackStage::Level => "level",
            FeedbackStage::Consistency => "consistency",
            FeedbackStage::Assessment => "assessment",
            FeedbackStage::Rubric => "rubric",
        };
        f.write_str(name)
    }
}

/// Errors emitted by `FeedbackValidator`.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("malformed feedback: {0}")]
    Malformed(String),

    #[error("invalid score: {0}")]
    Score(#[source] ScoreError),

    #[error("unknown answer level `{0}`")]
    UnknownLevel(String),

    #[error("score {score} does not match level {level} ({min}..={max})")]
    LevelMismatch {
        score: u8,
        level: AnswerLevel,
        min: u8,
        max: u8,
    },

    #[error("assessment must have 1 or 2 sentences, found {0}")]
    AssessmentLength(usize),

    #[error("rubric entry `{criterion}` is invalid: {reason}")]
    InvalidRubricEntry {
        criterion: String,
        reason: String,
    },
}

impl FeedbackError {
    #[must_use]
    pub fn stage(&self) -> FeedbackStage {
        match self {
            FeedbackError::Malformed(_) => FeedbackStage::Structure,
            FeedbackError::Score(_) => FeedbackStage::Range,
            FeedbackError::UnknownLevel(_) => FeedbackStage::Level,
            FeedbackError::LevelMismatch { .. } => FeedbackStage::Consistency,
            FeedbackError::AssessmentLength(_) => FeedbackStage::Assessment,
            FeedbackError::InvalidRubricEntry { .. } => FeedbackStage::Rubric,
        }
    }
}
