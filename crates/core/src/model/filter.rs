use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::exam::{Difficulty, ExamTree, ExamType, QuestionType};
use crate::model::params::{Season, SelectionParams};

//
// ─── FILTER STATE ──────────────────────────────────────────────────────────────
//

/// Inclusive range of minutes a question may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: u32,
    pub max: u32,
}

impl TimeRange {
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, minutes: u32) -> bool {
        (self.min..=self.max).contains(&minutes)
    }
}

/// Restricts questions to a particular exam sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFilter {
    pub exam_type: ExamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

/// User constraints on what the next question may be.
///
/// Every field is optional: `None` (or an empty list) leaves that dimension
/// unconstrained. Equality is structural, so two filters listing the same
/// values in a different order are different filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_types: Option<Vec<QuestionType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Vec<Difficulty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_test_cases: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,
}

/// Filter dimension a candidate failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMismatch {
    Topic,
    SubTopic,
    QuestionType,
    ProgrammingLanguage,
    TestCases,
    Difficulty,
    TimeLimit,
    ExamType,
    Year,
    Season,
}

impl fmt::Display for FilterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterMismatch::Topic => "topic",
            FilterMismatch::SubTopic => "subtopic",
            FilterMismatch::QuestionType => "question type",
            FilterMismatch::ProgrammingLanguage => "programming language",
            FilterMismatch::TestCases => "test cases",
            FilterMismatch::Difficulty => "difficulty",
            FilterMismatch::TimeLimit => "time limit",
            FilterMismatch::ExamType => "exam type",
            FilterMismatch::Year => "year",
            FilterMismatch::Season => "season",
        };
        f.write_str(name)
    }
}

/// `None` and `Some(empty)` both mean "no constraint".
fn constrained<T>(values: Option<&Vec<T>>) -> Option<&[T]> {
    values.filter(|v| !v.is_empty()).map(Vec::as_slice)
}

impl FilterState {
    /// True when no dimension is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        constrained(self.topics.as_ref()).is_none()
            && constrained(self.sub_topics.as_ref()).is_none()
            && constrained(self.question_types.as_ref()).is_none()
            && constrained(self.difficulty.as_ref()).is_none()
            && constrained(self.programming_languages.as_ref()).is_none()
            && self.time_limit.is_none()
            && self.has_test_cases != Some(true)
            && self.source.is_none()
    }

    /// Question types to rotate through: the filter's types restricted to
    /// `allowed`, in `allowed` order, or `allowed` itself when unconstrained.
    ///
    /// May be empty when the filter and the exam share no type.
    #[must_use]
    pub fn allowed_types(&self, allowed: &[QuestionType]) -> Vec<QuestionType> {
        match constrained(self.question_types.as_ref()) {
            Some(wanted) => allowed
                .iter()
                .copied()
                .filter(|t| wanted.contains(t))
                .collect(),
            None => allowed.to_vec(),
        }
    }

    /// Difficulties to rotate through: the filter's list or the full scale.
    #[must_use]
    pub fn allowed_difficulties(&self) -> Vec<Difficulty> {
        constrained(self.difficulty.as_ref())
            .map_or_else(|| Difficulty::ALL.to_vec(), <[Difficulty]>::to_vec)
    }

    /// First programming language the filter asks for, if any.
    #[must_use]
    pub fn preferred_language(&self) -> Option<&str> {
        constrained(self.programming_languages.as_ref())
            .and_then(|langs| langs.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn requires_test_cases(&self) -> bool {
        self.has_test_cases == Some(true)
    }

    /// Same filter with subtopic names resolved against `exam`, so a legacy
    /// alias matches the canonical id candidates carry. Names the exam does
    /// not know are kept as given.
    #[must_use]
    pub fn canonicalized(&self, exam: &ExamTree) -> FilterState {
        let sub_topics = self.sub_topics.as_ref().map(|names| {
            names
                .iter()
                .map(|name| {
                    exam.locate(name)
                        .map_or_else(|| name.clone(), |(_, sub)| sub.id.as_str().to_owned())
                })
                .collect()
        });
        FilterState {
            sub_topics,
            ..self.clone()
        }
    }

    /// Decides whether `params` satisfies every dimension of this filter.
    ///
    /// This is the only place that answers that question; the selector
    /// re-checks every candidate it builds through here.
    ///
    /// # Errors
    ///
    /// Returns the first dimension the candidate violates.
    pub fn admits(&self, params: &SelectionParams) -> Result<(), FilterMismatch> {
        if let Some(topics) = constrained(self.topics.as_ref()) {
            if !topics.iter().any(|t| t == params.topic.as_str()) {
                return Err(FilterMismatch::Topic);
            }
        }

        if let Some(subs) = constrained(self.sub_topics.as_ref()) {
            if !subs.iter().any(|s| s == params.subtopic.as_str()) {
                return Err(FilterMismatch::SubTopic);
            }
        }

        if let Some(types) = constrained(self.question_types.as_ref()) {
            if !types.contains(&params.question_type) {
                return Err(FilterMismatch::QuestionType);
            }
        }

        if params.question_type == QuestionType::Code {
            if let Some(langs) = constrained(self.programming_languages.as_ref()) {
                let matches = params
                    .programming_language
                    .as_deref()
                    .is_some_and(|lang| langs.iter().any(|l| l == lang));
                if !matches {
                    return Err(FilterMismatch::ProgrammingLanguage);
                }
            }
        }

        if self.requires_test_cases() && !params.include_test_cases {
            return Err(FilterMismatch::TestCases);
        }

        if let Some(levels) = constrained(self.difficulty.as_ref()) {
            if !levels.contains(&params.difficulty) {
                return Err(FilterMismatch::Difficulty);
            }
        }

        if let Some(range) = self.time_limit {
            if !range.contains(params.estimated_minutes) {
                return Err(FilterMismatch::TimeLimit);
            }
        }

        if let (Some(wanted), Some(actual)) = (&self.source, &params.source) {
            if wanted.exam_type != actual.exam_type {
                return Err(FilterMismatch::ExamType);
            }
            if wanted.year.is_some() && wanted.year != actual.year {
                return Err(FilterMismatch::Year);
            }
            if wanted.season.is_some() && wanted.season != actual.season {
                return Err(FilterMismatch::Season);
            }
        }

        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
