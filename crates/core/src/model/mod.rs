mod attempt;
mod exercise;
mod ids;
mod lesson;
mod profile;
mod settings;
mod summary;

pub use attempt::AttemptRecord;
pub use exercise::{
    Answer, Exercise, ExerciseBody, ExerciseError, ExerciseKind, MatchingPair, PLACEHOLDER,
};
pub use ids::{ExerciseId, LanguagePair, LessonId, ParseIdError, UnitId, UserId};
pub use lesson::{Lesson, LessonError, LessonOverview, LessonQuery};
pub use profile::{Milestone, Profile, ProfileUpdate, XP_THRESHOLDS, milestones_crossed};
pub use settings::AppSettings;
pub use summary::{SessionSummary, SessionSummaryError};
