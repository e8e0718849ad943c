use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{SubTopicId, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DifficultyError {
    #[error("difficulty must be between 1 and 5, got {0}")]
    OutOfRange(u8),
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Kind of question the external generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Open,
    /// Programming problem; may carry a language and test cases.
    Code,
    StepByStep,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::Open,
        QuestionType::Code,
        QuestionType::StepByStep,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Open => "open",
            QuestionType::Code => "code",
            QuestionType::StepByStep => "step_by_step",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty level from 1 (easiest) to 5 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// The full scale, easiest first.
    pub const ALL: [Difficulty; 5] = [
        Difficulty(1),
        Difficulty(2),
        Difficulty(3),
        Difficulty(4),
        Difficulty(5),
    ];

    /// # Errors
    ///
    /// Returns `DifficultyError::OutOfRange` outside 1..=5.
    pub fn new(value: u8) -> Result<Self, DifficultyError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DifficultyError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

//
// ─── EXAM TYPE ─────────────────────────────────────────────────────────────────
//

/// Which national exam track an exam belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    Bagrut,
    Mahat,
}

impl ExamType {
    #[must_use]
    pub fn education_level(self) -> EducationLevel {
        match self {
            ExamType::Bagrut => EducationLevel::HighSchool,
            ExamType::Mahat => EducationLevel::TechnicalCollege,
        }
    }
}

/// Target audience passed through to the question generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    TechnicalCollege,
}

//
// ─── TOPIC TREE ────────────────────────────────────────────────────────────────
//

/// Leaf of the exam tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    pub id: SubTopicId,
    /// Older identifier still found in saved selections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
}

impl SubTopic {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: SubTopicId::new(id),
            legacy_id: None,
        }
    }

    #[must_use]
    pub fn with_legacy_id(mut self, legacy: impl Into<String>) -> Self {
        self.legacy_id = Some(legacy.into());
        self
    }

    /// True when `candidate` names this subtopic by id or legacy alias.
    #[must_use]
    pub fn answers_to(&self, candidate: &str) -> bool {
        self.id.as_str() == candidate || self.legacy_id.as_deref() == Some(candidate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub sub_topics: Vec<SubTopic>,
}

impl Topic {
    #[must_use]
    pub fn new(id: impl Into<String>, sub_topics: Vec<SubTopic>) -> Self {
        Self {
            id: TopicId::new(id),
            sub_topics,
        }
    }
}

/// Read-only description of an exam: its topic tree and what it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamTree {
    pub id: String,
    pub title: String,
    pub exam_type: ExamType,
    pub allowed_question_types: Vec<QuestionType>,
    /// Expected minutes per question; engine settings supply the fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_question: Option<u32>,
    pub topics: Vec<Topic>,
}

impl ExamTree {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        exam_type: ExamType,
        allowed_question_types: Vec<QuestionType>,
        topics: Vec<Topic>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            exam_type,
            allowed_question_types,
            minutes_per_question: None,
            topics,
        }
    }

    #[must_use]
    pub fn with_minutes_per_question(mut self, minutes: u32) -> Self {
        self.minutes_per_question = Some(minutes);
        self
    }

    /// Finds the topic owning a subtopic, matching by id or legacy alias.
    ///
    /// Topics and subtopics are scanned in declaration order; the first match wins.
    #[must_use]
    pub fn locate(&self, candidate: &str) -> Option<(&Topic, &SubTopic)> {
        self.topics.iter().find_map(|topic| {
            topic
                .sub_topics
                .iter()
                .find(|sub| sub.answers_to(candidate))
                .map(|sub| (topic, sub))
        })
    }
}

/// Ordered subtopic ids (or legacy aliases) the learner chose to practice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSelection {
    pub sub_topics: Vec<String>,
}

impl TopicSelection {
    #[must_use]
    pub fn new<I, S>(sub_topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sub_topics: sub_topics.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sub_topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_topics.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
