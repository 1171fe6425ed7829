use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use lingo_core::model::{
    Answer, Exercise, LanguagePair, Lesson, LessonId, SessionSummary,
};

use crate::error::SessionError;

/// Tunables for a lesson session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lives the learner starts with; never replenished within a session.
    pub starting_hearts: u32,
    /// Fixed XP award per correctly answered exercise.
    pub xp_per_exercise: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_hearts: 3,
            xp_per_exercise: 10,
        }
    }
}

/// Observable state of the session machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the learner to pick and check an answer.
    Answering,
    /// The current answer has been graded; waiting for continue.
    Checked,
    /// All exercises done, or the session ended out of hearts.
    Over,
}

/// Result of an `advance` transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Advanced {
    /// Moved to the next exercise, back in `Answering`.
    Next,
    /// Hearts hit zero on a wrong answer: hard stop, remaining exercises
    /// are skipped and no completion summary is produced.
    OutOfHearts,
    /// Last exercise graded; the session is complete.
    Completed(SessionSummary),
}

/// In-memory state machine for one lesson run.
///
/// Owns all session state exclusively; mutation happens only through
/// [`select_answer`](Self::select_answer), [`check_answer`](Self::check_answer)
/// and [`advance`](Self::advance). The exercise order is a uniformly random
/// permutation fixed at start and never re-shuffled.
pub struct LessonSession {
    lesson_id: LessonId,
    languages: LanguagePair,
    exercises: Vec<Exercise>,
    current: usize,
    selected: Option<Answer>,
    checked: bool,
    correct: bool,
    hearts: u32,
    xp_earned: u32,
    correct_count: u32,
    config: SessionConfig,
    started_at: DateTime<Utc>,
    over: bool,
    completed: bool,
}

impl LessonSession {
    /// Start a session with the default thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidLesson` if the lesson has no exercises.
    pub fn start(
        lesson: Lesson,
        config: SessionConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(lesson, config, now, &mut rand::rng())
    }

    /// Start a session, shuffling the exercises with the given RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidLesson` if the lesson has no exercises.
    pub fn start_with_rng<R: Rng + ?Sized>(
        lesson: Lesson,
        config: SessionConfig,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if lesson.is_empty() {
            return Err(SessionError::InvalidLesson);
        }

        let lesson_id = lesson.id().clone();
        let languages = lesson.languages().clone();
        let mut exercises = lesson.into_exercises();
        exercises.shuffle(rng);

        Ok(Self {
            lesson_id,
            languages,
            exercises,
            current: 0,
            selected: None,
            checked: false,
            correct: false,
            hearts: config.starting_hearts,
            xp_earned: 0,
            correct_count: 0,
            config,
            started_at: now,
            over: false,
            completed: false,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.over {
            SessionState::Over
        } else if self.checked {
            SessionState::Checked
        } else {
            SessionState::Answering
        }
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        if self.over {
            None
        } else {
            self.exercises.get(self.current)
        }
    }

    /// The shuffled exercise order, for rendering and tests.
    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&Answer> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Grading result of the current exercise; meaningful only in `Checked`.
    #[must_use]
    pub fn was_correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn hearts(&self) -> u32 {
        self.hearts
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
    pub fn total_exercises(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// True iff the session ended by finishing every exercise.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Fraction of exercises completed *before* the current one, in `[0, 1]`.
    ///
    /// Intentionally `current / total`, not `(current + 1) / total`: the
    /// in-progress exercise does not count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        self.current as f64 / self.exercises.len() as f64
    }

    /// Store the learner's pending response. Only effective while
    /// `Answering`; once checked the grading is immutable and this is a
    /// no-op. No side effects beyond the state update.
    pub fn select_answer(&mut self, answer: Answer) {
        if self.state() == SessionState::Answering {
            self.selected = Some(answer);
        }
    }

    /// Grade the pending answer and transition to `Checked`.
    ///
    /// Pure with respect to the exercise: the same `(exercise, answer)`
    /// always grades the same. On a correct answer the XP and correct
    /// accumulators grow; on a wrong one a heart is lost (floor 0).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Over` after the session ended,
    /// `SessionError::AlreadyChecked` when called twice, and
    /// `SessionError::NothingSelected` without a pending answer.
    pub fn check_answer(&mut self) -> Result<bool, SessionError> {
        if self.over {
            return Err(SessionError::Over);
        }
        if self.checked {
            return Err(SessionError::AlreadyChecked);
        }
        let Some(answer) = self.selected.as_ref() else {
            return Err(SessionError::NothingSelected);
        };
        let exercise = self
            .exercises
            .get(self.current)
            .ok_or(SessionError::Over)?;

        let correct = exercise.grade(answer);
        self.checked = true;
        self.correct = correct;

        if correct {
            self.correct_count += 1;
            self.xp_earned += self.config.xp_per_exercise;
        } else {
            self.hearts = self.hearts.saturating_sub(1);
        }

        Ok(correct)
    }

    /// Leave the `Checked` state: either move on, stop out of hearts, or
    /// complete the lesson.
    ///
    /// Completion is produced exactly once; calling again afterwards fails
    /// with `SessionError::Over`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotChecked` outside `Checked`,
    /// `SessionError::Over` after the session ended, and a summary error if
    /// `now` is before the session start.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advanced, SessionError> {
        if self.over {
            return Err(SessionError::Over);
        }
        if !self.checked {
            return Err(SessionError::NotChecked);
        }

        if self.hearts == 0 && !self.correct {
            self.over = true;
            return Ok(Advanced::OutOfHearts);
        }

        if self.current + 1 >= self.exercises.len() {
            self.over = true;
            self.completed = true;
            let total = u32::try_from(self.exercises.len()).unwrap_or(u32::MAX);
            let summary = SessionSummary::new(
                self.lesson_id.clone(),
                self.xp_earned,
                self.correct_count,
                total,
                self.hearts,
                true,
                self.started_at,
                now,
            )?;
            return Ok(Advanced::Completed(summary));
        }

        self.current += 1;
        self.selected = None;
        self.checked = false;
        self.correct = false;
        Ok(Advanced::Next)
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", &self.lesson_id)
            .field("exercises_len", &self.exercises.len())
            .field("current", &self.current)
            .field("state", &self.state())
            .field("hearts", &self.hearts)
            .field("xp_earned", &self.xp_earned)
            .field("correct_count", &self.correct_count)
            .finish_non_exhaustive()
    }
}
