#![forbid(unsafe_code)]

pub mod error;
pub mod feedback;
pub mod progress;
pub mod selection;

pub use prep_core::Clock;

pub use error::{FeedbackError, FeedbackStage, ProgressError, SelectorError};

pub use feedback::{FeedbackValidator, GradedFeedback, RubricScore, calculate_answer_level};
pub use progress::{SetProgressTracker, SubscriptionId};
pub use selection::{QuestionSelector, RotationCursor};
