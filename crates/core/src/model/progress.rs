use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::settings::DEFAULT_SET_CAPACITY;
use crate::scoring::SetQuestionStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("set capacity must be > 0")]
    ZeroCapacity,

    #[error("practice set is full ({capacity} questions)")]
    CapacityExceeded { capacity: usize },

    #[error("no question has been started in this set")]
    NoActiveSlot,

    #[error("slot {index} already has an outcome")]
    SlotAlreadyRecorded { index: usize },
}

/// Learner progress through one fixed-size practice set.
///
/// Slots before the cursor hold outcomes (or `Pending` if the learner skipped
/// grading); slots after it are always `Pending`. A slot leaves `Pending` at most
/// once per set and only [`SetProgress::cleared`] brings it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProgress {
    /// `-1` before the first question.
    current_index: i64,
    results: Vec<SetQuestionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Default for SetProgress {
    fn default() -> Self {
        Self {
            current_index: -1,
            results: vec![SetQuestionStatus::Pending; DEFAULT_SET_CAPACITY],
            updated_at: None,
        }
    }
}

impl SetProgress {
    /// Fresh set with every slot pending and the cursor before the first slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ProgressError> {
        if capacity == 0 {
            return Err(ProgressError::ZeroCapacity);
        }
        Ok(Self {
            current_index: -1,
            results: vec![SetQuestionStatus::Pending; capacity],
            updated_at: None,
        })
    }

    /// Same capacity, back to the initial state.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            current_index: -1,
            results: vec![SetQuestionStatus::Pending; self.results.len()],
            updated_at: None,
        }
    }

    /// Cursor position, `-1` before the first question.
    #[must_use]
    pub fn current_index(&self) -> i64 {
        self.current_index
    }

    /// Cursor position as a slot index, `None` before the first question.
    #[must_use]
    pub fn current_slot(&self) -> Option<usize> {
        usize::try_from(self.current_index).ok()
    }

    /// One-based position for display, `0` before the first question.
    #[must_use]
    pub fn display_index(&self) -> usize {
        self.current_slot().map_or(0, |slot| slot + 1)
    }

    #[must_use]
    pub fn results(&self) -> &[SetQuestionStatus] {
        &self.results
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Moves the cursor to the next slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::CapacityExceeded` when the cursor is already on
    /// the last slot; the cursor does not move.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<usize, ProgressError> {
        let next = self.current_slot().map_or(0, |slot| slot + 1);
        if next >= self.results.len() {
            return Err(ProgressError::CapacityExceeded {
                capacity: self.results.len(),
            });
        }
        self.current_index = i64::try_from(next).map_err(|_| ProgressError::CapacityExceeded {
            capacity: self.results.len(),
        })?;
        self.updated_at = Some(at);
        Ok(next)
    }

    /// Stores the outcome for the current slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveSlot` before the first question and
    /// `ProgressError::SlotAlreadyRecorded` if the slot already has an outcome.
    pub fn record(
        &mut self,
        status: SetQuestionStatus,
        at: DateTime<Utc>,
    ) -> Result<usize, ProgressError> {
        let slot = self.current_slot().ok_or(ProgressError::NoActiveSlot)?;
        let entry = self
            .results
            .get_mut(slot)
            .ok_or(ProgressError::NoActiveSlot)?;
        if entry.is_resolved() {
            return Err(ProgressError::SlotAlreadyRecorded { index: slot });
        }
        *entry = status;
        self.updated_at = Some(at);
        Ok(slot)
    }

    /// Aggregated counts for display.
    #[must_use]
    pub fn summary(&self) -> SetSummary {
        let count = |wanted: SetQuestionStatus| self.results.iter().filter(|s| **s == wanted).count();
        let success = count(SetQuestionStatus::Success);
        let partial = count(SetQuestionStatus::Partial);
        let failure = count(SetQuestionStatus::Failure);
        let answered = success + partial + failure;
        SetSummary {
            total: self.results.len(),
            answered,
            remaining: self.results.len() - answered,
            success,
            partial,
            failure,
            is_complete: answered == self.results.len(),
        }
    }
}

/// Aggregated view of a practice set, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub success: usize,
    pub partial: usize,
    pub failure: usize,
    pub is_complete: bool,
}
