use tracing::{debug, error, warn};

use prep_core::model::{
    DEFAULT_MAX_SELECTION_ATTEMPTS, DEFAULT_MINUTES_PER_QUESTION, EngineSettings, ExamTree,
    FilterState, QuestionSource, QuestionType, SelectionParams, TopicSelection,
};

use super::cursor::{PoolSizes, RotationCursor};
use crate::error::SelectorError;

//
// ─── SELECTOR ──────────────────────────────────────────────────────────────────
//

/// Picks the parameters for the next generated question.
///
/// Rotates round-robin through the selected subtopics, the question types the
/// exam and filter allow, and the allowed difficulties. Every candidate is
/// checked against the whole active filter before it is returned; after
/// `max_attempts` rejected candidates the selector gives up instead of looping.
///
/// One selector belongs to one practice session.
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    exam: ExamTree,
    selection: TopicSelection,
    filter: FilterState,
    cursor: RotationCursor,
    max_attempts: usize,
    default_minutes: u32,
}

impl QuestionSelector {
    /// Create a selector over `selection` within `exam`, with no filter.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::EmptySelection` if no subtopics were selected and
    /// `SelectorError::NoQuestionTypes` if the exam allows no question type.
    pub fn new(exam: ExamTree, selection: TopicSelection) -> Result<Self, SelectorError> {
        if selection.is_empty() {
            return Err(SelectorError::EmptySelection);
        }
        if exam.allowed_question_types.is_empty() {
            return Err(SelectorError::NoQuestionTypes { exam: exam.id });
        }

        Ok(Self {
            exam,
            selection,
            filter: FilterState::default(),
            cursor: RotationCursor::default(),
            max_attempts: DEFAULT_MAX_SELECTION_ATTEMPTS,
            default_minutes: DEFAULT_MINUTES_PER_QUESTION,
        })
    }

    /// Same as [`QuestionSelector::new`], using limits from engine settings.
    ///
    /// # Errors
    ///
    /// See [`QuestionSelector::new`].
    pub fn from_settings(
        exam: ExamTree,
        selection: TopicSelection,
        settings: &EngineSettings,
    ) -> Result<Self, SelectorError> {
        Ok(Self::new(exam, selection)?
            .with_max_attempts(settings.max_selection_attempts())
            .with_default_minutes(settings.minutes_per_question()))
    }

    /// Override how many candidates are tried per request (at least one).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Pace used when the exam does not declare one.
    #[must_use]
    pub fn with_default_minutes(mut self, minutes: u32) -> Self {
        self.default_minutes = minutes;
        self
    }

    #[must_use]
    pub fn exam(&self) -> &ExamTree {
        &self.exam
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn cursor(&self) -> RotationCursor {
        self.cursor
    }

    /// Replace the active filter.
    ///
    /// Subtopic aliases in the filter are resolved to canonical ids first. A
    /// filter that differs from the current one restarts type and difficulty
    /// rotation; the subtopic position is kept so topic coverage carries over.
    /// An equal filter changes nothing.
    pub fn set_filter(&mut self, filter: FilterState) {
        let filter = filter.canonicalized(&self.exam);
        if filter == self.filter {
            return;
        }
        debug!(
            subtopic_index = self.cursor.subtopic,
            "filter changed, restarting type and difficulty rotation"
        );
        self.filter = filter;
        self.cursor.restart_dimensions();
    }

    /// Return to the first subtopic, type and difficulty.
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// Advance all three rotation counters by one.
    pub fn rotate_indices(&mut self) {
        let pools = self.pool_sizes();
        self.cursor.advance(pools);
    }

    /// Produce the next admissible candidate and move the rotation on.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::ParentTopicNotFound` immediately if a selected
    /// subtopic is missing from the exam tree, and
    /// `SelectorError::Unsatisfiable` once `max_attempts` candidates were rejected.
    pub fn next_parameters(&mut self) -> Result<SelectionParams, SelectorError> {
        for attempt in 1..=self.max_attempts {
            match self.candidate()? {
                Some(params) => match self.filter.admits(&params) {
                    Ok(()) => {
                        debug!(
                            attempt,
                            topic = %params.topic,
                            subtopic = %params.subtopic,
                            question_type = %params.question_type,
                            difficulty = params.difficulty.value(),
                            "selected question parameters"
                        );
                        self.rotate_indices();
                        return Ok(params);
                    }
                    Err(dimension) => {
                        debug!(attempt, %dimension, "candidate rejected by filter");
                    }
                },
                None => debug!(attempt, "filter leaves no question type for this exam"),
            }
            self.rotate_indices();
        }

        warn!(
            attempts = self.max_attempts,
            "no candidate satisfies the active filter"
        );
        Err(SelectorError::Unsatisfiable {
            attempts: self.max_attempts,
        })
    }

    fn pool_sizes(&self) -> PoolSizes {
        PoolSizes {
            subtopics: self.selection.len(),
            question_types: self
                .filter
                .allowed_types(&self.exam.allowed_question_types)
                .len(),
            difficulties: self.filter.allowed_difficulties().len(),
        }
    }

    /// Provenance for candidates: this exam's track, with the sitting the
    /// filter asks for passed on to the generator.
    fn source(&self) -> QuestionSource {
        let requested = self.filter.source.as_ref();
        QuestionSource {
            exam_type: self.exam.exam_type,
            year: requested.and_then(|s| s.year),
            season: requested.and_then(|s| s.season),
        }
    }

    /// Candidate at the current cursor, or `None` when a pool is empty.
    fn candidate(&self) -> Result<Option<SelectionParams>, SelectorError> {
        let Some(raw) = self
            .selection
            .sub_topics
            .get(self.cursor.subtopic % self.selection.len())
        else {
            return Ok(None);
        };

        let Some((topic, sub_topic)) = self.exam.locate(raw) else {
            error!(subtopic = %raw, exam = %self.exam.id, "selected subtopic has no parent topic");
            return Err(SelectorError::ParentTopicNotFound {
                subtopic: raw.clone(),
            });
        };

        let types = self.filter.allowed_types(&self.exam.allowed_question_types);
        let question_type = match types.as_slice() {
            [] => return Ok(None),
            [only] => *only,
            many => many[self.cursor.question_type % many.len()],
        };

        let difficulties = self.filter.allowed_difficulties();
        let Some(difficulty) = difficulties
            .get(self.cursor.difficulty % difficulties.len().max(1))
            .copied()
        else {
            return Ok(None);
        };

        let is_code = question_type == QuestionType::Code;
        let programming_language = if is_code {
            self.filter.preferred_language().map(str::to_owned)
        } else {
            None
        };

        Ok(Some(SelectionParams {
            topic: topic.id.clone(),
            subtopic: sub_topic.id.clone(),
            question_type,
            difficulty,
            programming_language,
            include_test_cases: is_code && self.filter.requires_test_cases(),
            estimated_minutes: self.exam.minutes_per_question.unwrap_or(self.default_minutes),
            subject: self.exam.title.clone(),
            education_level: self.exam.exam_type.education_level(),
            source: Some(self.source()),
        }))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{
        Difficulty, EducationLevel, EngineSettingsDraft, ExamType, Season, SourceFilter, SubTopic,
        TimeRange, Topic,
    };

    fn exam(types: Vec<QuestionType>) -> ExamTree {
        ExamTree::new(
            "bagrut_cs",
            "Computer Science",
            ExamType::Bagrut,
            types,
            vec![
                Topic::new("basics", vec![SubTopic::new("a"), SubTopic::new("b")]),
                Topic::new(
                    "oop",
                    vec![SubTopic::new("classes").with_legacy_id("Classes and Objects")],
                ),
            ],
        )
    }

    fn all_types() -> Vec<QuestionType> {
        QuestionType::ALL.to_vec()
    }

    fn difficulty(v: u8) -> Difficulty {
        Difficulty::new(v).unwrap()
    }

    #[test]
    fn rejects_empty_configuration() {
        let err = QuestionSelector::new(exam(all_types()), TopicSelection::default()).unwrap_err();
        assert_eq!(err, SelectorError::EmptySelection);

        let err = QuestionSelector::new(exam(vec![]), TopicSelection::new(["a"])).unwrap_err();
        assert!(matches!(err, SelectorError::NoQuestionTypes { .. }));
    }

    #[test]
    fn rotates_through_subtopics_types_and_difficulties() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "b"])).unwrap();

        let first = selector.next_parameters().unwrap();
        assert_eq!(first.subtopic.as_str(), "a");
        assert_eq!(first.question_type, QuestionType::MultipleChoice);
        assert_eq!(first.difficulty, difficulty(1));
        assert_eq!(first.subject, "Computer Science");
        assert_eq!(first.education_level, EducationLevel::HighSchool);
        assert_eq!(first.estimated_minutes, DEFAULT_MINUTES_PER_QUESTION);

        let second = selector.next_parameters().unwrap();
        assert_eq!(second.subtopic.as_str(), "b");
        assert_eq!(second.question_type, QuestionType::Open);
        assert_eq!(second.difficulty, difficulty(2));

        let third = selector.next_parameters().unwrap();
        assert_eq!(third.subtopic.as_str(), "a");
        assert_eq!(third.question_type, QuestionType::Code);
        assert_eq!(third.difficulty, difficulty(3));
    }

    #[test]
    fn legacy_alias_resolves_to_canonical_subtopic() {
        let mut selector = QuestionSelector::new(
            exam(all_types()),
            TopicSelection::new(["Classes and Objects"]),
        )
        .unwrap();

        let params = selector.next_parameters().unwrap();
        assert_eq!(params.topic.as_str(), "oop");
        assert_eq!(params.subtopic.as_str(), "classes");
    }

    #[test]
    fn unknown_subtopic_fails_without_retrying() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["missing"])).unwrap();

        let err = selector.next_parameters().unwrap_err();
        assert_eq!(
            err,
            SelectorError::ParentTopicNotFound {
                subtopic: "missing".into()
            }
        );
        assert!(!err.is_recoverable());
        assert_eq!(selector.cursor(), RotationCursor::default());
    }

    #[test]
    fn disjoint_type_filter_gives_up_after_ten_attempts() {
        let mut selector = QuestionSelector::new(
            exam(vec![QuestionType::MultipleChoice, QuestionType::Open]),
            TopicSelection::new(["a"]),
        )
        .unwrap();
        selector.set_filter(FilterState {
            question_types: Some(vec![QuestionType::Code]),
            ..FilterState::default()
        });

        let err = selector.next_parameters().unwrap_err();
        assert_eq!(err, SelectorError::Unsatisfiable { attempts: 10 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn single_allowed_type_is_pinned() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "b"])).unwrap();
        selector.set_filter(FilterState {
            question_types: Some(vec![QuestionType::Open]),
            difficulty: Some(vec![difficulty(4), difficulty(5)]),
            ..FilterState::default()
        });

        for expected in [4, 5, 4] {
            let params = selector.next_parameters().unwrap();
            assert_eq!(params.question_type, QuestionType::Open);
            assert_eq!(params.difficulty, difficulty(expected));
        }
    }

    #[test]
    fn code_questions_carry_language_and_test_cases() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a"])).unwrap();
        selector.set_filter(FilterState {
            question_types: Some(vec![QuestionType::Code]),
            programming_languages: Some(vec!["java".into(), "python".into()]),
            has_test_cases: Some(true),
            ..FilterState::default()
        });

        let params = selector.next_parameters().unwrap();
        assert_eq!(params.question_type, QuestionType::Code);
        assert_eq!(params.programming_language.as_deref(), Some("java"));
        assert!(params.include_test_cases);
    }

    #[test]
    fn test_case_filter_skips_non_code_types() {
        let mut selector = QuestionSelector::new(
            exam(vec![QuestionType::Open, QuestionType::Code]),
            TopicSelection::new(["a"]),
        )
        .unwrap();
        selector.set_filter(FilterState {
            has_test_cases: Some(true),
            ..FilterState::default()
        });

        // type cursor starts on `open`, which cannot carry test cases
        let params = selector.next_parameters().unwrap();
        assert_eq!(params.question_type, QuestionType::Code);
    }

    #[test]
    fn time_limit_outside_exam_pace_is_unsatisfiable() {
        let exam = exam(all_types()).with_minutes_per_question(15);
        let mut selector = QuestionSelector::new(exam, TopicSelection::new(["a"]))
            .unwrap()
            .with_max_attempts(3);
        selector.set_filter(FilterState {
            time_limit: Some(TimeRange::new(1, 10)),
            ..FilterState::default()
        });

        assert_eq!(
            selector.next_parameters().unwrap_err(),
            SelectorError::Unsatisfiable { attempts: 3 }
        );

        selector.set_filter(FilterState {
            time_limit: Some(TimeRange::new(10, 20)),
            ..FilterState::default()
        });
        assert_eq!(selector.next_parameters().unwrap().estimated_minutes, 15);
    }

    #[test]
    fn source_year_and_season_are_requested_from_the_generator() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a"])).unwrap();
        selector.set_filter(FilterState {
            source: Some(SourceFilter {
                exam_type: ExamType::Bagrut,
                year: Some(2023),
                season: Some(Season::Summer),
            }),
            ..FilterState::default()
        });

        let params = selector.next_parameters().unwrap();
        let source = params.source.unwrap();
        assert_eq!(source.exam_type, ExamType::Bagrut);
        assert_eq!(source.year, Some(2023));
        assert_eq!(source.season, Some(Season::Summer));
    }

    #[test]
    fn source_on_another_exam_track_is_unsatisfiable() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a"])).unwrap();
        selector.set_filter(FilterState {
            source: Some(SourceFilter {
                exam_type: ExamType::Mahat,
                year: Some(2023),
                season: None,
            }),
            ..FilterState::default()
        });

        assert_eq!(
            selector.next_parameters().unwrap_err(),
            SelectorError::Unsatisfiable { attempts: 10 }
        );
    }

    #[test]
    fn subtopic_filter_accepts_legacy_alias() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "classes"]))
                .unwrap();
        selector.set_filter(FilterState {
            sub_topics: Some(vec!["Classes and Objects".into()]),
            ..FilterState::default()
        });

        let params = selector.next_parameters().unwrap();
        assert_eq!(params.subtopic.as_str(), "classes");
        assert_eq!(
            selector.filter().sub_topics,
            Some(vec!["classes".to_string()])
        );
    }

    #[test]
    fn changed_filter_restarts_type_and_difficulty_only() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "b", "classes"]))
                .unwrap();
        selector.next_parameters().unwrap();
        selector.next_parameters().unwrap();
        let before = selector.cursor();
        assert_eq!(before.subtopic, 2);
        assert_eq!(before.question_type, 2);
        assert_eq!(before.difficulty, 2);

        selector.set_filter(FilterState {
            difficulty: Some(vec![difficulty(3)]),
            ..FilterState::default()
        });
        let after = selector.cursor();
        assert_eq!(after.subtopic, 2);
        assert_eq!(after.question_type, 0);
        assert_eq!(after.difficulty, 0);
    }

    #[test]
    fn equal_filter_changes_nothing() {
        let filter = FilterState {
            difficulty: Some(vec![difficulty(2), difficulty(3)]),
            ..FilterState::default()
        };
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "b"])).unwrap();
        selector.set_filter(filter.clone());
        selector.next_parameters().unwrap();
        let before = selector.cursor();

        selector.set_filter(filter.clone());
        assert_eq!(selector.cursor(), before);
        assert_eq!(selector.filter(), &filter);
    }

    #[test]
    fn reset_returns_to_the_start() {
        let mut selector =
            QuestionSelector::new(exam(all_types()), TopicSelection::new(["a", "b"])).unwrap();
        let first = selector.next_parameters().unwrap();
        selector.next_parameters().unwrap();

        selector.reset();
        assert_eq!(selector.cursor(), RotationCursor::default());
        assert_eq!(selector.next_parameters().unwrap(), first);
    }

    #[test]
    fn settings_control_attempts_and_pace() {
        let settings = EngineSettingsDraft::from_json_str(
            r#"{"maxSelectionAttempts": 2, "minutesPerQuestion": 7}"#,
        )
        .unwrap()
        .validate()
        .unwrap();
        let mut selector =
            QuestionSelector::from_settings(exam(all_types()), TopicSelection::new(["a"]), &settings)
                .unwrap();
        assert_eq!(selector.next_parameters().unwrap().estimated_minutes, 7);

        selector.set_filter(FilterState {
            topics: Some(vec!["oop".into()]),
            ..FilterState::default()
        });
        assert_eq!(
            selector.next_parameters().unwrap_err(),
            SelectorError::Unsatisfiable { attempts: 2 }
        );
    }
}
