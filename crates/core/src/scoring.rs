//! Score bands for graded answers.
//!
//! A single table maps a score in `0..=100` to a label at two granularities:
//! the fine eight-way [`AnswerLevel`] used by feedback, and the coarse
//! [`SetQuestionStatus`] shown per slot in a practice set. Both go through
//! [`classify`], so the breakpoints live in exactly one place per granularity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("score must be between 0 and 100, got {0}")]
    OutOfRange(i64),
    #[error("score must be a whole number, got {0}")]
    NotIntegral(f64),
    #[error("unknown answer level: {0}")]
    UnknownLevel(String),
}

//
// ─── ANSWER SCORE ──────────────────────────────────────────────────────────────
//

/// Grader score, a whole number in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnswerScore(u8);

impl AnswerScore {
    pub const MAX: u8 = 100;
    pub const ZERO: AnswerScore = AnswerScore(0);
    pub const PERFECT: AnswerScore = AnswerScore(100);

    /// # Errors
    ///
    /// Returns `ScoreError::OutOfRange` above 100.
    pub fn new(value: u8) -> Result<Self, ScoreError> {
        if value > Self::MAX {
            return Err(ScoreError::OutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Accepts a JSON-style number, rejecting fractions and out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NotIntegral` for non-finite or fractional input and
    /// `ScoreError::OutOfRange` outside `0..=100`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(value: f64) -> Result<Self, ScoreError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ScoreError::NotIntegral(value));
        }
        if !(0.0..=f64::from(Self::MAX)).contains(&value) {
            return Err(ScoreError::OutOfRange(value as i64));
        }
        Ok(Self(value as u8))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Iterates every valid score, lowest first.
    pub fn all() -> impl Iterator<Item = AnswerScore> {
        (0..=Self::MAX).map(AnswerScore)
    }
}

impl TryFrom<u8> for AnswerScore {
    type Error = ScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnswerScore> for u8 {
    fn from(value: AnswerScore) -> Self {
        value.0
    }
}

impl fmt::Display for AnswerScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── BANDS ─────────────────────────────────────────────────────────────────────
//

/// Inclusive score range bound to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand<T> {
    pub label: T,
    pub min: u8,
    pub max: u8,
}

impl<T> ScoreBand<T> {
    const fn new(label: T, min: u8, max: u8) -> Self {
        Self { label, min, max }
    }

    #[must_use]
    pub fn range(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }

    #[must_use]
    pub fn contains(&self, score: AnswerScore) -> bool {
        self.range().contains(&score.value())
    }
}

/// A label family that partitions `0..=100` into bands.
///
/// Bands are listed in table order; when two bands share a score the first one
/// is what [`classify`] returns.
pub trait ScoreBanded: Copy + PartialEq + 'static {
    const BANDS: &'static [ScoreBand<Self>];

    /// Band declared for this label.
    #[must_use]
    fn band(self) -> ScoreBand<Self> {
        Self::BANDS
            .iter()
            .copied()
            .find(|b| b.label == self)
            .unwrap_or(ScoreBand::new(self, 0, 0))
    }
}

/// Maps a score to its label at the granularity chosen by `T`.
#[must_use]
pub fn classify<T: ScoreBanded>(score: AnswerScore) -> T {
    T::BANDS
        .iter()
        .find(|b| b.contains(score))
        .map_or(T::BANDS[0].label, |b| b.label)
}

//
// ─── FINE: ANSWER LEVEL ────────────────────────────────────────────────────────
//

/// Eight-way quality classification of a graded answer, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerLevel {
    Perfect,
    Excellent,
    Good,
    Partial,
    Weak,
    Insufficient,
    NoUnderstanding,
    Irrelevant,
}

impl ScoreBanded for AnswerLevel {
    const BANDS: &'static [ScoreBand<Self>] = &[
        ScoreBand::new(AnswerLevel::Perfect, 100, 100),
        ScoreBand::new(AnswerLevel::Excellent, 95, 99),
        ScoreBand::new(AnswerLevel::Good, 80, 94),
        ScoreBand::new(AnswerLevel::Partial, 60, 79),
        ScoreBand::new(AnswerLevel::Weak, 30, 59),
        ScoreBand::new(AnswerLevel::Insufficient, 1, 29),
        ScoreBand::new(AnswerLevel::NoUnderstanding, 0, 0),
        ScoreBand::new(AnswerLevel::Irrelevant, 0, 0),
    ];
}

/// How to read a score of exactly zero.
///
/// The score alone cannot tell an answer that shows no understanding from one
/// that is off-topic; only the grader knows which it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroScore {
    #[default]
    NoUnderstanding,
    Irrelevant,
}

impl AnswerLevel {
    pub const ALL: [AnswerLevel; 8] = [
        AnswerLevel::Perfect,
        AnswerLevel::Excellent,
        AnswerLevel::Good,
        AnswerLevel::Partial,
        AnswerLevel::Weak,
        AnswerLevel::Insufficient,
        AnswerLevel::NoUnderstanding,
        AnswerLevel::Irrelevant,
    ];

    /// Level for `score`, with zero resolved by the caller.
    #[must_use]
    pub fn from_score(score: AnswerScore, zero: ZeroScore) -> Self {
        match (score.value(), zero) {
            (0, ZeroScore::Irrelevant) => AnswerLevel::Irrelevant,
            (0, ZeroScore::NoUnderstanding) => AnswerLevel::NoUnderstanding,
            _ => classify(score),
        }
    }

    /// Inclusive score range this level requires.
    #[must_use]
    pub fn score_range(self) -> RangeInclusive<u8> {
        self.band().range()
    }

    #[must_use]
    pub fn accepts(self, score: AnswerScore) -> bool {
        self.band().contains(score)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerLevel::Perfect => "PERFECT",
            AnswerLevel::Excellent => "EXCELLENT",
            AnswerLevel::Good => "GOOD",
            AnswerLevel::Partial => "PARTIAL",
            AnswerLevel::Weak => "WEAK",
            AnswerLevel::Insufficient => "INSUFFICIENT",
            AnswerLevel::NoUnderstanding => "NO_UNDERSTANDING",
            AnswerLevel::Irrelevant => "IRRELEVANT",
        }
    }
}

impl fmt::Display for AnswerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerLevel {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnswerLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ScoreError::UnknownLevel(s.to_string()))
    }
}

/// Level for `score`, reading zero as `NoUnderstanding`.
///
/// Use [`AnswerLevel::from_score`] when the grader says whether a zero was
/// off-topic.
#[must_use]
pub fn calculate_answer_level(score: AnswerScore) -> AnswerLevel {
    AnswerLevel::from_score(score, ZeroScore::NoUnderstanding)
}

//
// ─── COARSE: SET QUESTION STATUS ───────────────────────────────────────────────
//

/// Per-slot status shown in a practice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetQuestionStatus {
    #[default]
    Pending,
    Success,
    Partial,
    Failure,
}

impl ScoreBanded for SetQuestionStatus {
    const BANDS: &'static [ScoreBand<Self>] = &[
        ScoreBand::new(SetQuestionStatus::Success, 80, 100),
        ScoreBand::new(SetQuestionStatus::Partial, 70, 79),
        ScoreBand::new(SetQuestionStatus::Failure, 0, 69),
    ];
}

impl SetQuestionStatus {
    #[must_use]
    pub fn from_score(score: AnswerScore) -> Self {
        classify(score)
    }

    /// True once an outcome has been recorded.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        self != SetQuestionStatus::Pending
    }
}

/// True when `score` earns a green (success) status.
#[must_use]
pub fn is_successful(score: AnswerScore) -> bool {
    SetQuestionStatus::from_score(score) == SetQuestionStatus::Success
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
