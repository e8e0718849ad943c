use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use prep_core::Clock;
use prep_core::model::{EngineSettings, PrepId, ProgressError, SetProgress, SetSummary};
use prep_core::scoring::{AnswerScore, SetQuestionStatus};

use super::listeners::{
    Listeners, ProgressListener, QuestionListener, SubscriptionCounter, SubscriptionId,
};
use crate::feedback::GradedFeedback;

/// Per-session progress through fixed-size practice sets.
///
/// The host owns one tracker and passes it where it is needed. Each practice
/// session (keyed by `PrepId`) gets its own [`SetProgress`], created on first
/// use. Subscribers are called synchronously after each change, in the order
/// they subscribed, and always see the state after the mutation.
pub struct SetProgressTracker {
    sets: HashMap<PrepId, SetProgress>,
    blank: SetProgress,
    clock: Clock,
    progress_listeners: Listeners<ProgressListener>,
    question_listeners: Listeners<QuestionListener>,
    subscriptions: SubscriptionCounter,
}

impl Default for SetProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SetProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetProgressTracker")
            .field("sets", &self.sets.len())
            .field("capacity", &self.blank.capacity())
            .field("clock", &self.clock)
            .field("progress_listeners", &self.progress_listeners.len())
            .field("question_listeners", &self.question_listeners.len())
            .finish()
    }
}

/// Existing set for `prep`, or a fresh copy of `blank`.
fn entry<'a>(
    sets: &'a mut HashMap<PrepId, SetProgress>,
    blank: &SetProgress,
    prep: &PrepId,
) -> &'a mut SetProgress {
    sets.entry(prep.clone()).or_insert_with(|| blank.clone())
}

impl SetProgressTracker {
    /// Tracker with ten-question sets and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_blank(SetProgress::default())
    }

    /// # Errors
    ///
    /// Returns `ProgressError::ZeroCapacity` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ProgressError> {
        Ok(Self::from_blank(SetProgress::new(capacity)?))
    }

    /// # Errors
    ///
    /// See [`SetProgressTracker::with_capacity`].
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, ProgressError> {
        Self::with_capacity(settings.set_capacity())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn from_blank(blank: SetProgress) -> Self {
        Self {
            sets: HashMap::new(),
            blank,
            clock: Clock::default(),
            progress_listeners: Listeners::default(),
            question_listeners: Listeners::default(),
            subscriptions: SubscriptionCounter::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.blank.capacity()
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────
    //

    /// Current state for `prep`, creating an empty set on first access.
    pub fn set_progress(&mut self, prep: &PrepId) -> &SetProgress {
        entry(&mut self.sets, &self.blank, prep)
    }

    /// Current state for `prep` without creating it.
    #[must_use]
    pub fn peek(&self, prep: &PrepId) -> Option<&SetProgress> {
        self.sets.get(prep)
    }

    pub fn summary(&mut self, prep: &PrepId) -> SetSummary {
        self.set_progress(prep).summary()
    }

    /// One-based question number for display; `0` before the first question.
    pub fn display_index(&mut self, prep: &PrepId) -> usize {
        self.set_progress(prep).display_index()
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Moves `prep` to its next slot and notifies question subscribers.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::CapacityExceeded` when the set is already on its
    /// last slot; nothing changes and nobody is notified.
    pub fn handle_new_question(&mut self, prep: &PrepId) -> Result<usize, ProgressError> {
        let at = self.clock.now();
        let progress = entry(&mut self.sets, &self.blank, prep);
        let index = progress.advance(at)?;
        debug!(prep_id = %prep, index, "advanced to next question");

        for callback in self.question_listeners.for_prep(prep) {
            callback(Some(index));
        }
        Ok(index)
    }

    /// Records the outcome of the current question and notifies progress subscribers.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveSlot` before the first question and
    /// `ProgressError::SlotAlreadyRecorded` if the current slot already has an
    /// outcome. Nobody is notified on error.
    pub fn handle_feedback(
        &mut self,
        prep: &PrepId,
        score: AnswerScore,
    ) -> Result<SetQuestionStatus, ProgressError> {
        let status = SetQuestionStatus::from_score(score);
        let at = self.clock.now();
        let progress = entry(&mut self.sets, &self.blank, prep);
        let index = progress.record(status, at)?;
        debug!(prep_id = %prep, index, score = score.value(), ?status, "recorded outcome");

        let progress = &*progress;
        for callback in self.progress_listeners.for_prep(prep) {
            callback(progress);
        }
        Ok(status)
    }

    /// Same as [`SetProgressTracker::handle_feedback`] for validated grader output.
    ///
    /// # Errors
    ///
    /// See [`SetProgressTracker::handle_feedback`].
    pub fn handle_graded(
        &mut self,
        prep: &PrepId,
        feedback: &GradedFeedback,
    ) -> Result<SetQuestionStatus, ProgressError> {
        self.handle_feedback(prep, feedback.score)
    }

    /// Starts `prep` over: question subscribers get `None`, then progress
    /// subscribers get the empty set.
    pub fn clear_set(&mut self, prep: &PrepId) {
        let progress = self.blank.clone();
        debug!(prep_id = %prep, "cleared practice set");
        self.sets.insert(prep.clone(), progress);

        for callback in self.question_listeners.for_prep(prep) {
            callback(None);
        }
        if let Some(progress) = self.sets.get(prep) {
            for callback in self.progress_listeners.for_prep(prep) {
                callback(progress);
            }
        }
    }

    //
    // ─── SUBSCRIPTIONS ─────────────────────────────────────────────────────
    //

    /// Subscribes to outcome changes for `prep`.
    ///
    /// The callback is called once right away with the current state.
    pub fn on_progress_change<F>(&mut self, prep: &PrepId, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&SetProgress) + Send + 'static,
    {
        callback(&*entry(&mut self.sets, &self.blank, prep));
        let id = self.subscriptions.next();
        self.progress_listeners
            .insert(id, prep.clone(), Box::new(callback));
        id
    }

    /// Subscribes to question changes for `prep`.
    ///
    /// The callback is called once right away with the current slot.
    pub fn on_question_change<F>(&mut self, prep: &PrepId, mut callback: F) -> SubscriptionId
    where
        F: FnMut(Option<usize>) + Send + 'static,
    {
        callback(entry(&mut self.sets, &self.blank, prep).current_slot());
        let id = self.subscriptions.next();
        self.question_listeners
            .insert(id, prep.clone(), Box::new(callback));
        id
    }

    /// Returns false if `id` was not a progress subscription.
    pub fn off_progress_change(&mut self, id: SubscriptionId) -> bool {
        self.progress_listeners.remove(id)
    }

    /// Returns false if `id` was not a question subscription.
    pub fn off_question_change(&mut self, id: SubscriptionId) -> bool {
        self.question_listeners.remove(id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
