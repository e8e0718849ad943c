mod validator;

// Public API of the feedback subsystem.
pub use crate::error::{FeedbackError, FeedbackStage};
pub use prep_core::scoring::{AnswerLevel, ZeroScore, calculate_answer_level};
pub use validator::{FeedbackValidator, GradedFeedback, RubricScore};
