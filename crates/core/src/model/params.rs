use serde::{Deserialize, Serialize};

use crate::model::exam::{Difficulty, EducationLevel, ExamType, QuestionType};
use crate::model::ids::{SubTopicId, TopicId};

/// Exam sitting a question is modelled after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Summer,
}

/// Provenance attached to generated questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSource {
    pub exam_type: ExamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(exam_type: ExamType) -> Self {
        Self {
            exam_type,
            year: None,
            season: None,
        }
    }
}

/// Concrete request handed to the question generator.
///
/// Every value produced by the selector has passed `FilterState::admits`
/// for the filter that was active at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionParams {
    pub topic: TopicId,
    /// Canonical subtopic id, never the legacy alias.
    pub subtopic: SubTopicId,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default)]
    pub include_test_cases: bool,
    pub estimated_minutes: u32,
    pub subject: String,
    pub education_level: EducationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<QuestionSource>,
}
