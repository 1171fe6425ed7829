use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use lingo_core::model::{
    AppSettings, AttemptRecord, LanguagePair, Lesson, LessonId, LessonOverview, LessonQuery,
    UnitId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Content provider: lessons keyed by language pair, unit, and lesson id.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Persist or replace a lesson with its exercises.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Fetch a lesson by query. `Ok(None)` when not found; the caller is
    /// expected to redirect out of the lesson flow in that case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for adapter failures (not for absence).
    async fn get_lesson(&self, query: &LessonQuery) -> Result<Option<Lesson>, StorageError>;

    /// List lessons of a unit, without exercise payloads.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for adapter failures.
    async fn list_lessons(
        &self,
        languages: &LanguagePair,
        unit_id: &UnitId,
    ) -> Result<Vec<LessonOverview>, StorageError>;
}

/// Secondary store for attempt logs: the fallback write path when the
/// remote profile store rejects an attempt.
#[async_trait]
pub trait AttemptLogRepository: Send + Sync {
    /// Append one attempt record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn insert_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError>;
}

/// Persisted learner preferences (sound on/off).
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` for adapter failures.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if persistence fails.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

type LessonKey = (String, String, String);

fn lesson_key(languages: &LanguagePair, lesson_id: &LessonId) -> LessonKey {
    (
        languages.native.clone(),
        languages.learning.clone(),
        lesson_id.as_str().to_string(),
    )
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<HashMap<LessonKey, Lesson>>>,
    attempts: Arc<Mutex<Vec<AttemptRecord>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts stored so far, oldest first. Test helper.
    ///
    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    #[must_use]
    pub fn logged_attempts(&self) -> Vec<AttemptRecord> {
        self.attempts.lock().expect("attempt log lock").clone()
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(lesson_key(lesson.languages(), lesson.id()), lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, query: &LessonQuery) -> Result<Option<Lesson>, StorageError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let found = guard
            .get(&lesson_key(&query.languages, &query.lesson_id))
            .filter(|lesson| *lesson.unit_id() == query.unit_id)
            .cloned();
        Ok(found)
    }

    async fn list_lessons(
        &self,
        languages: &LanguagePair,
        unit_id: &UnitId,
    ) -> Result<Vec<LessonOverview>, StorageError> {
        let guard = self
            .lessons
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut overviews: Vec<LessonOverview> = guard
            .values()
            .filter(|lesson| lesson.languages() == languages && lesson.unit_id() == unit_id)
            .map(|lesson| LessonOverview {
                id: lesson.id().clone(),
                unit_id: lesson.unit_id().clone(),
                title: lesson.title().to_string(),
                exercise_count: lesson.exercises().len(),
            })
            .collect();
        overviews.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(overviews)
    }
}

#[async_trait]
impl AttemptLogRepository for InMemoryRepository {
    async fn insert_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*settings);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
    pub attempts: Arc<dyn AttemptLogRepository>,
    pub settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptLogRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Self {
            lessons,
            attempts,
            settings,
        }
    }
}
