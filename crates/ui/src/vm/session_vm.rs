//! View-model around the lesson session: maps the current exercise for
//! rendering and funnels UI intents into the state machine.

use std::sync::Arc;

use lingo_core::model::{Answer, AppSettings, LessonQuery, Profile, UserId};
use services::{
    CompletionOutcome, LessonRunner, LessonSession, RunnerAdvance, RunnerError,
    SessionState,
};

use crate::views::ViewError;

use super::exercise_vm::ExerciseVm;
use super::match_vm::MatchOutcome;

/// Outcome of continuing past a checked answer.
#[derive(Debug, Clone)]
pub enum LessonOutcome {
    Continue,
    OutOfHearts,
    Completed(Box<CompletionOutcome>),
}

#[derive(Debug)]
pub struct LessonVm {
    session: LessonSession,
    exercise: Option<ExerciseVm>,
    chosen: Option<String>,
}

impl LessonVm {
    fn new(session: LessonSession) -> Self {
        let exercise = session.current_exercise().map(ExerciseVm::for_exercise);
        Self {
            session,
            exercise,
            chosen: None,
        }
    }

    #[must_use]
    pub fn exercise(&self) -> Option<&ExerciseVm> {
        self.exercise.as_ref()
    }

    #[must_use]
    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn hearts(&self) -> u32 {
        self.session.hearts()
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.session.xp_earned()
    }

    #[must_use]
    pub fn was_correct(&self) -> bool {
        self.session.was_correct()
    }

    /// Progress in percent for the top bar.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.session.progress() * 100.0
    }

    #[must_use]
    pub fn can_check(&self) -> bool {
        self.state() == SessionState::Answering && self.session.selected_answer().is_some()
    }

    /// Pick an option for the choice-style kinds. Ignored once checked.
    pub fn choose(&mut self, value: impl Into<String>) {
        if self.state() != SessionState::Answering {
            return;
        }
        let value = value.into();
        self.session.select_answer(Answer::choice(value.clone()));
        self.chosen = Some(value);
    }

    pub fn pick_match_left(&mut self, pair_index: usize) {
        if self.state() != SessionState::Answering {
            return;
        }
        if let Some(ExerciseVm::Matching { board }) = self.exercise.as_mut() {
            board.pick_left(pair_index);
        }
    }

    /// Pick a right-column tile. When this completes the board, its one
    /// completion report becomes the session answer.
    pub fn pick_match_right(&mut self, pair_index: usize) -> MatchOutcome {
        if self.state() != SessionState::Answering {
            return MatchOutcome::Ignored;
        }
        let Some(ExerciseVm::Matching { board }) = self.exercise.as_mut() else {
            return MatchOutcome::Ignored;
        };

        let outcome = board.pick_right(pair_index);
        if let Some(report) = board.take_report() {
            self.session.select_answer(Answer::Matching {
                mistakes: report.mistakes,
            });
        }
        outcome
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the session rejects the check.
    pub fn check(
        &mut self,
        runner: &LessonRunner,
        user_id: &UserId,
        settings: &AppSettings,
    ) -> Result<bool, ViewError> {
        runner
            .check_current(&mut self.session, user_id, settings)
            .map_err(|_| ViewError::Unknown)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the session rejects the
    /// transition.
    pub async fn advance(
        &mut self,
        runner: &LessonRunner,
        profile: &Profile,
        settings: &AppSettings,
    ) -> Result<LessonOutcome, ViewError> {
        let advanced = runner
            .advance(&mut self.session, profile, settings)
            .await
            .map_err(|_| ViewError::Unknown)?;

        Ok(match advanced {
            RunnerAdvance::Next => {
                self.exercise = self.session.current_exercise().map(ExerciseVm::for_exercise);
                self.chosen = None;
                LessonOutcome::Continue
            }
            RunnerAdvance::OutOfHearts => LessonOutcome::OutOfHearts,
            RunnerAdvance::Completed(outcome) => LessonOutcome::Completed(outcome),
        })
    }
}

/// Load the lesson and build the view-model.
///
/// # Errors
///
/// Returns `ViewError::LessonUnavailable` when the lesson is missing or
/// empty; callers redirect to the lesson list. Everything else maps to
/// `ViewError::Unknown`.
pub async fn start_lesson(
    runner: &Arc<LessonRunner>,
    query: &LessonQuery,
) -> Result<LessonVm, ViewError> {
    let session = match runner.start_lesson(query).await {
        Ok(session) => session,
        Err(RunnerError::LessonUnavailable) => return Err(ViewError::LessonUnavailable),
        Err(_) => return Err(ViewError::Unknown),
    };
    Ok(LessonVm::new(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::{
        Exercise, ExerciseId, LanguagePair, Lesson, LessonId, MatchingPair, UnitId,
    };
    use lingo_core::time::fixed_clock;
    use services::{AttemptRecorder, NoopPlayer, SessionConfig};
    use storage::repository::{InMemoryRepository, LessonRepository};

    fn matching_lesson() -> Lesson {
        let exercise = Exercise::matching(
            ExerciseId::new(1),
            vec![
                MatchingPair::new("Hello", "Selam"),
                MatchingPair::new("Yes", "Awo"),
            ],
        )
        .unwrap();
        Lesson::new(
            LessonId::new("greetings-1"),
            UnitId::new("greetings"),
            LanguagePair::new("en", "am"),
            "Greetings",
            vec![exercise],
        )
        .unwrap()
    }

    fn runner_for(repo: Arc<InMemoryRepository>) -> Arc<LessonRunner> {
        let recorder = Arc::new(AttemptRecorder::new(None, repo.clone()));
        Arc::new(LessonRunner::new(
            repo,
            recorder,
            None,
            Arc::new(NoopPlayer),
            fixed_clock(),
            SessionConfig::default(),
        ))
    }

    fn query() -> LessonQuery {
        LessonQuery {
            languages: LanguagePair::new("en", "am"),
            unit_id: UnitId::new("greetings"),
            lesson_id: LessonId::new("greetings-1"),
        }
    }

    #[tokio::test]
    async fn missing_lesson_maps_to_redirect_error() {
        let runner = runner_for(Arc::new(InMemoryRepository::new()));
        let err = start_lesson(&runner, &query()).await.unwrap_err();
        assert_eq!(err, ViewError::LessonUnavailable);
    }

    #[tokio::test]
    async fn matching_with_a_mismatch_grades_wrong_and_costs_a_heart() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&matching_lesson()).await.unwrap();
        let runner = runner_for(repo);

        let mut vm = start_lesson(&runner, &query()).await.unwrap();
        assert!(vm.exercise().is_some_and(ExerciseVm::is_matching));
        assert!(!vm.can_check());

        // Hello paired with Awo first: one mismatch.
        vm.pick_match_left(0);
        assert_eq!(vm.pick_match_right(1), MatchOutcome::Mismatch);
        assert_eq!(vm.pick_match_right(0), MatchOutcome::Matched);
        vm.pick_match_left(1);
        assert_eq!(vm.pick_match_right(1), MatchOutcome::Matched);

        // The board completion became the pending answer.
        assert!(vm.can_check());

        let user = UserId::new("learner-1");
        let settings = AppSettings::default();
        let correct = vm.check(&runner, &user, &settings).unwrap();
        assert!(!correct);
        assert_eq!(vm.hearts(), 2);
    }

    #[tokio::test]
    async fn clean_matching_run_completes_the_lesson() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&matching_lesson()).await.unwrap();
        let runner = runner_for(repo);

        let mut vm = start_lesson(&runner, &query()).await.unwrap();
        vm.pick_match_left(0);
        vm.pick_match_right(0);
        vm.pick_match_left(1);
        vm.pick_match_right(1);

        let user = UserId::new("learner-1");
        let settings = AppSettings::default();
        assert!(vm.check(&runner, &user, &settings).unwrap());

        let profile = Profile::new(user);
        let outcome = vm.advance(&runner, &profile, &settings).await.unwrap();
        let LessonOutcome::Completed(completion) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(completion.summary.xp_earned(), 10);
    }

    #[tokio::test]
    async fn choice_selection_is_frozen_after_check() {
        let repo = Arc::new(InMemoryRepository::new());
        let exercise = Exercise::translation(
            ExerciseId::new(1),
            "Hello",
            "Selam",
            vec!["Selam".into(), "Awo".into(), "Aydelem".into()],
        )
        .unwrap();
        let lesson = Lesson::new(
            LessonId::new("greetings-1"),
            UnitId::new("greetings"),
            LanguagePair::new("en", "am"),
            "Greetings",
            vec![exercise],
        )
        .unwrap();
        repo.upsert_lesson(&lesson).await.unwrap();
        let runner = runner_for(repo);

        let mut vm = start_lesson(&runner, &query()).await.unwrap();
        vm.choose("Selam");

        let user = UserId::new("learner-1");
        let settings = AppSettings::default();
        assert!(vm.check(&runner, &user, &settings).unwrap());

        vm.choose("Awo");
        assert_eq!(vm.chosen(), Some("Selam"));
        assert!(vm.was_correct());
    }
}
