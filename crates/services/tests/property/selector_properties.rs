use prep_core::model::{
    Difficulty, ExamTree, ExamType, FilterState, PrepId, QuestionType, Season, SourceFilter,
    SubTopic, TimeRange, Topic, TopicSelection,
};
use prep_core::scoring::{AnswerScore, SetQuestionStatus};
use prep_services::{QuestionSelector, SelectorError, SetProgressTracker};
use proptest::prelude::*;

fn exam() -> ExamTree {
    ExamTree::new(
        "bagrut_cs",
        "Computer Science",
        ExamType::Bagrut,
        vec![QuestionType::MultipleChoice, QuestionType::Open, QuestionType::Code],
        vec![
            Topic::new("basics", vec![SubTopic::new("variables"), SubTopic::new("loops")]),
            Topic::new("oop", vec![SubTopic::new("classes")]),
        ],
    )
}

fn source_strategy() -> impl Strategy<Value = SourceFilter> {
    (
        prop::sample::select(vec![ExamType::Bagrut, ExamType::Mahat]),
        prop::option::of(2015u16..2025),
        prop::option::of(prop::sample::select(vec![Season::Winter, Season::Summer])),
    )
        .prop_map(|(exam_type, year, season)| SourceFilter {
            exam_type,
            year,
            season,
        })
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop::option::of(prop::sample::subsequence(vec!["basics", "oop"], 0..=2)),
        prop::option::of(prop::sample::subsequence(
            vec!["variables", "loops", "classes"],
            0..=3,
        )),
        prop::option::of(prop::sample::subsequence(QuestionType::ALL.to_vec(), 0..=4)),
        prop::option::of(prop::sample::subsequence(Difficulty::ALL.to_vec(), 0..=5)),
        prop::option::of(prop::sample::subsequence(vec!["python", "java"], 0..=2)),
        prop::option::of((0u32..8, 0u32..8)),
        prop::option::of(any::<bool>()),
        prop::option::of(source_strategy()),
    )
        .prop_map(|(topics, subs, types, levels, langs, time, tests, source)| FilterState {
            topics: topics.map(|t| t.into_iter().map(String::from).collect()),
            sub_topics: subs.map(|s| s.into_iter().map(String::from).collect()),
            question_types: types,
            difficulty: levels,
            programming_languages: langs.map(|l| l.into_iter().map(String::from).collect()),
            time_limit: time.map(|(a, b)| TimeRange::new(a.min(b), a.max(b))),
            has_test_cases: tests,
            source,
            ..FilterState::default()
        })
}

proptest! {
    #[test]
    fn selected_parameters_always_satisfy_the_filter(
        filter in filter_strategy(),
        calls in 1usize..12,
    ) {
        let mut selector = QuestionSelector::new(
            exam(),
            TopicSelection::new(["variables", "classes", "loops"]),
        )
        .unwrap();
        selector.set_filter(filter.clone());

        for _ in 0..calls {
            match selector.next_parameters() {
                Ok(params) => prop_assert_eq!(filter.admits(&params), Ok(())),
                Err(err) => prop_assert_eq!(err, SelectorError::Unsatisfiable { attempts: 10 }),
            }
        }
    }

    #[test]
    fn sitting_on_the_exam_track_is_always_served(
        year in prop::option::of(2000u16..2030),
        season in prop::option::of(prop::sample::select(vec![Season::Winter, Season::Summer])),
    ) {
        let mut selector = QuestionSelector::new(exam(), TopicSelection::new(["loops"])).unwrap();
        let filter = FilterState {
            source: Some(SourceFilter { exam_type: ExamType::Bagrut, year, season }),
            ..FilterState::default()
        };
        selector.set_filter(filter.clone());

        let params = selector.next_parameters().unwrap();
        prop_assert_eq!(filter.admits(&params), Ok(()));
        let source = params.source.unwrap();
        prop_assert_eq!(source.year, year);
        prop_assert_eq!(source.season, season);
    }

    #[test]
    fn cursor_counts_new_questions(n in 1usize..=10) {
        let mut tracker = SetProgressTracker::new();
        let prep = PrepId::new("prop");
        for _ in 0..n {
            tracker.handle_new_question(&prep).unwrap();
        }
        let expected = i64::try_from(n).unwrap() - 1;
        prop_assert_eq!(tracker.set_progress(&prep).current_index(), expected);
    }

    #[test]
    fn summary_accounts_for_every_slot(scores in prop::collection::vec(0u8..=100, 0..=10)) {
        let mut tracker = SetProgressTracker::new();
        let prep = PrepId::new("prop");
        for value in &scores {
            tracker.handle_new_question(&prep).unwrap();
            tracker.handle_feedback(&prep, AnswerScore::new(*value).unwrap()).unwrap();
        }

        let summary = tracker.summary(&prep);
        prop_assert_eq!(summary.answered, scores.len());
        prop_assert_eq!(summary.success + summary.partial + summary.failure, summary.answered);
        prop_assert_eq!(summary.answered + summary.remaining, summary.total);
        let pending = tracker
            .set_progress(&prep)
            .results()
            .iter()
            .filter(|s| **s == SetQuestionStatus::Pending)
            .count();
        prop_assert_eq!(pending, summary.remaining);
    }
}
