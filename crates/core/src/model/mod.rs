mod exam;
mod filter;
mod ids;
mod params;
mod progress;
mod settings;

pub use exam::{
    Difficulty, DifficultyError, EducationLevel, ExamTree, ExamType, QuestionType, SubTopic, Topic,
    TopicSelection,
};
pub use filter::{FilterMismatch, FilterState, SourceFilter, TimeRange};
pub use ids::{ParseIdError, PrepId, SubTopicId, TopicId};
pub use params::{QuestionSource, Season, SelectionParams};
pub use progress::{ProgressError, SetProgress, SetSummary};
pub use settings::{
    DEFAULT_MAX_SELECTION_ATTEMPTS, DEFAULT_MINUTES_PER_QUESTION, DEFAULT_SET_CAPACITY,
    EngineSettings, EngineSettingsDraft, SettingsError,
};
