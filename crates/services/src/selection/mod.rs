mod cursor;
mod selector;

// Public API of the selection subsystem.
pub use crate::error::SelectorError;
pub use cursor::{PoolSizes, RotationCursor};
pub use selector::QuestionSelector;
