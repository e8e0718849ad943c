use std::fmt;

use prep_core::model::{PrepId, SetProgress};

/// Called with the full set state after every recorded outcome.
pub type ProgressListener = Box<dyn FnMut(&SetProgress) + Send>;

/// Called with the new slot index; `None` means the set was cleared.
pub type QuestionListener = Box<dyn FnMut(Option<usize>) + Send>;

/// Handle returned by a subscription, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Entry<F> {
    id: SubscriptionId,
    prep: PrepId,
    callback: F,
}

/// Per-practice-session callbacks, kept in registration order.
pub(crate) struct Listeners<F> {
    entries: Vec<Entry<F>>,
}

impl<F> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F> Listeners<F> {
    pub(crate) fn insert(&mut self, id: SubscriptionId, prep: PrepId, callback: F) {
        self.entries.push(Entry { id, prep, callback });
    }

    /// Drops the subscription; false when `id` was not registered here.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Callbacks subscribed to `prep`, oldest first.
    pub(crate) fn for_prep<'a>(&'a mut self, prep: &'a PrepId) -> impl Iterator<Item = &'a mut F> {
        self.entries
            .iter_mut()
            .filter(move |entry| &entry.prep == prep)
            .map(|entry| &mut entry.callback)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Hands out subscription ids that are unique within one tracker.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionCounter(u64);

impl SubscriptionCounter {
    pub(crate) fn next(&mut self) -> SubscriptionId {
        self.0 += 1;
        SubscriptionId(self.0)
    }
}
