use thiserror::Error;

use crate::model::{DifficultyError, ProgressError, SettingsError};
use crate::rubric::RubricError;
use crate::scoring::ScoreError;

/// Any error raised by the core model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Rubric(#[from] RubricError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
