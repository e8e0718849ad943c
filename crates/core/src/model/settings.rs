use serde::Deserialize;
use thiserror::Error;

/// Slots in a practice set unless configured otherwise.
pub const DEFAULT_SET_CAPACITY: usize = 10;

/// Candidates the selector tries before giving up on a filter.
pub const DEFAULT_MAX_SELECTION_ATTEMPTS: usize = 10;

/// Pace assumed for exams that do not declare one.
pub const DEFAULT_MINUTES_PER_QUESTION: u32 = 4;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("set capacity must be > 0")]
    InvalidSetCapacity,

    #[error("max selection attempts must be > 0")]
    InvalidMaxSelectionAttempts,

    #[error("minutes per question must be > 0")]
    InvalidMinutesPerQuestion,

    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    set_capacity: usize,
    max_selection_attempts: usize,
    minutes_per_question: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            set_capacity: DEFAULT_SET_CAPACITY,
            max_selection_attempts: DEFAULT_MAX_SELECTION_ATTEMPTS,
            minutes_per_question: DEFAULT_MINUTES_PER_QUESTION,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn set_capacity(&self) -> usize {
        self.set_capacity
    }

    #[must_use]
    pub fn max_selection_attempts(&self) -> usize {
        self.max_selection_attempts
    }

    /// Pace assumed for exams that do not declare one.
    #[must_use]
    pub fn minutes_per_question(&self) -> u32 {
        self.minutes_per_question
    }
}

/// Unvalidated settings as read from the host; missing fields take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineSettingsDraft {
    #[serde(default)]
    pub set_capacity: Option<usize>,
    #[serde(default)]
    pub max_selection_attempts: Option<usize>,
    #[serde(default)]
    pub minutes_per_question: Option<u32>,
}

impl EngineSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Parse` for malformed JSON or unknown keys.
    pub fn from_json_str(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fill defaults and check bounds.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any provided value is zero.
    pub fn validate(self) -> Result<EngineSettings, SettingsError> {
        let defaults = EngineSettings::default();

        let set_capacity = self.set_capacity.unwrap_or(defaults.set_capacity);
        if set_capacity == 0 {
            return Err(SettingsError::InvalidSetCapacity);
        }

        let max_selection_attempts = self
            .max_selection_attempts
            .unwrap_or(defaults.max_selection_attempts);
        if max_selection_attempts == 0 {
            return Err(SettingsError::InvalidMaxSelectionAttempts);
        }

        let minutes_per_question = self
            .minutes_per_question
            .unwrap_or(defaults.minutes_per_question);
        if minutes_per_question == 0 {
            return Err(SettingsError::InvalidMinutesPerQuestion);
        }

        Ok(EngineSettings {
            set_capacity,
            max_selection_attempts,
            minutes_per_question,
        })
    }
}
