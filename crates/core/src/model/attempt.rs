use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Answer, Exercise, ExerciseId, ExerciseKind, LanguagePair, LessonId, UserId};

/// One graded attempt, as reported to the profile store (and to the local
/// fallback store when the remote write fails).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub lesson_id: LessonId,
    pub languages: LanguagePair,
    pub kind: ExerciseKind,
    pub question: String,
    pub expected_answer: String,
    pub given_answer: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// Build a record from a graded exercise.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_graded(
        user_id: UserId,
        lesson_id: LessonId,
        languages: LanguagePair,
        exercise: &Exercise,
        given: &Answer,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            exercise_id: exercise.id(),
            lesson_id,
            languages,
            kind: exercise.kind(),
            question: exercise.question_text(),
            expected_answer: exercise.expected_answer(),
            given_answer: given.describe(),
            is_correct,
            answered_at,
        }
    }
}
