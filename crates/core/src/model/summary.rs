use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct count ({correct}) exceeds total exercises ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("summary needs at least one exercise")]
    Empty,
}

/// Aggregate result for a finished lesson session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    lesson_id: LessonId,
    xp_earned: u32,
    correct_count: u32,
    total_exercises: u32,
    hearts_left: u32,
    completed: bool,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// # Errors
    ///
    /// Returns `SessionSummaryError` if counts or the time range do not
    /// align.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lesson_id: LessonId,
        xp_earned: u32,
        correct_count: u32,
        total_exercises: u32,
        hearts_left: u32,
        completed: bool,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionSummaryError> {
        if total_exercises == 0 {
            return Err(SessionSummaryError::Empty);
        }
        if correct_count > total_exercises {
            return Err(SessionSummaryError::CountMismatch {
                correct: correct_count,
                total: total_exercises,
            });
        }
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }

        Ok(Self {
            lesson_id,
            xp_earned,
            correct_count,
            total_exercises,
            hearts_left,
            completed,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_exercises(&self) -> u32 {
        self.total_exercises
    }

    #[must_use]
    pub fn hearts_left(&self) -> u32 {
        self.hearts_left
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Fraction of exercises answered correctly, in `[0, 1]`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        f64::from(self.correct_count) / f64::from(self.total_exercises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn accuracy_is_correct_over_total() {
        let now = fixed_now();
        let summary = SessionSummary::new(
            LessonId::new("greetings-1"),
            30,
            3,
            4,
            2,
            true,
            now,
            now,
        )
        .unwrap();
        assert!((summary.accuracy() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_correct_above_total() {
        let now = fixed_now();
        let err = SessionSummary::new(
            LessonId::new("greetings-1"),
            50,
            5,
            4,
            3,
            true,
            now,
            now,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SessionSummaryError::CountMismatch { correct: 5, total: 4 }
        ));
    }

    #[test]
    fn rejects_inverted_time_range() {
        let now = fixed_now();
        let err = SessionSummary::new(
            LessonId::new("greetings-1"),
            10,
            1,
            1,
            3,
            true,
            now,
            now - chrono::Duration::seconds(1),
        )
        .unwrap_err();
        assert!(matches!(err, SessionSummaryError::InvalidTimeRange));
    }
}
