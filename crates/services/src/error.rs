//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::SessionSummaryError;
use storage::repository::StorageError;

/// Errors emitted by the lesson session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson has no exercises")]
    InvalidLesson,
    #[error("no answer selected for the current exercise")]
    NothingSelected,
    #[error("current answer already checked")]
    AlreadyChecked,
    #[error("current answer has not been checked yet")]
    NotChecked,
    #[error("session already over")]
    Over,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

/// Errors emitted by profile-sync writes. All of these are transient: the
/// callers recover via the fallback path or drop the write with a log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("profile sync is not configured")]
    Disabled,
    #[error("profile sync request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LessonRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// Lesson not found or empty. Handled by redirecting out of the lesson
    /// flow, never by an in-app error banner.
    #[error("lesson unavailable")]
    LessonUnavailable,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
