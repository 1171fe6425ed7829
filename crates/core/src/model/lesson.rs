use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Exercise, LanguagePair, LessonId, UnitId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title must not be empty")]
    EmptyTitle,
}

/// An ordered bundle of exercises for a language/topic pair.
///
/// A lesson may be empty at this level; the session controller is the one
/// that refuses to start on an empty exercise list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    unit_id: UnitId,
    languages: LanguagePair,
    title: String,
    exercises: Vec<Exercise>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        unit_id: UnitId,
        languages: LanguagePair,
        title: impl Into<String>,
        exercises: Vec<Exercise>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        Ok(Self {
            id,
            unit_id,
            languages,
            title,
            exercises,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }

    #[must_use]
    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Consume the lesson, yielding its exercises in authored order.
    #[must_use]
    pub fn into_exercises(self) -> Vec<Exercise> {
        self.exercises
    }
}

/// Lookup key for the content provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonQuery {
    pub languages: LanguagePair,
    pub unit_id: UnitId,
    pub lesson_id: LessonId,
}

/// Listing row for unit screens; no exercise payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonOverview {
    pub id: LessonId,
    pub unit_id: UnitId,
    pub title: String,
    pub exercise_count: usize,
}
