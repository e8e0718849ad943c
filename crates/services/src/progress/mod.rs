mod listeners;
mod tracker;

// Public API of the progress subsystem.
pub use crate::error::ProgressError;
pub use listeners::{ProgressListener, QuestionListener, SubscriptionId};
pub use tracker::SetProgressTracker;
