//! Orchestration around [`LessonSession`]: content loading, attempt
//! reporting, sounds, profile updates and rewards.
//!
//! The runner owns every side effect of a lesson run so the state machine
//! itself stays pure. Attempt writes are spawned fire-and-forget; profile
//! and milestone pushes happen on completion and their failures are logged,
//! never surfaced.

use std::sync::Arc;

use lingo_core::model::{
    AppSettings, AttemptRecord, LanguagePair, LessonOverview, LessonQuery, Milestone,
    Profile, SessionSummary, UnitId, UserId, milestones_crossed,
};
use lingo_core::reward::RewardTier;
use lingo_core::time::Clock;
use storage::repository::LessonRepository;

use crate::audio::{SoundEvent, SoundPlayer, play_if_enabled};
use crate::error::{RunnerError, SessionError};
use crate::reward::draw_reward;
use crate::session::{Advanced, LessonSession, SessionConfig};
use crate::sync::{AttemptRecorder, ProfileSync};

/// Everything the UI needs when a lesson finishes successfully.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub summary: SessionSummary,
    /// Profile after applying the completion.
    pub profile: Profile,
    /// Milestones this completion crossed, each fired at most once.
    pub milestones: Vec<Milestone>,
    pub reward_tier: RewardTier,
}

/// Runner-level view of a session transition.
#[derive(Debug, Clone)]
pub enum RunnerAdvance {
    Next,
    OutOfHearts,
    Completed(Box<CompletionOutcome>),
}

pub struct LessonRunner {
    lessons: Arc<dyn LessonRepository>,
    recorder: Arc<AttemptRecorder>,
    sync: Option<Arc<dyn ProfileSync>>,
    sounds: Arc<dyn SoundPlayer>,
    clock: Clock,
    config: SessionConfig,
}

impl LessonRunner {
    #[must_use]
    pub fn new(
        lessons: Arc<dyn LessonRepository>,
        recorder: Arc<AttemptRecorder>,
        sync: Option<Arc<dyn ProfileSync>>,
        sounds: Arc<dyn SoundPlayer>,
        clock: Clock,
        config: SessionConfig,
    ) -> Self {
        Self {
            lessons,
            recorder,
            sync,
            sounds,
            clock,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Lessons available for a unit, for the lesson list view.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Storage` when the repository fails.
    pub async fn available_lessons(
        &self,
        languages: &LanguagePair,
        unit_id: &UnitId,
    ) -> Result<Vec<LessonOverview>, RunnerError> {
        Ok(self.lessons.list_lessons(languages, unit_id).await?)
    }

    /// Load the lesson and start a fresh shuffled session.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::LessonUnavailable` when the lesson does not
    /// exist or has no exercises. Callers redirect to the lesson list in
    /// that case.
    pub async fn start_lesson(
        &self,
        query: &LessonQuery,
    ) -> Result<LessonSession, RunnerError> {
        let lesson = self
            .lessons
            .get_lesson(query)
            .await?
            .ok_or(RunnerError::LessonUnavailable)?;

        LessonSession::start(lesson, self.config, self.clock.now()).map_err(|err| {
            match err {
                SessionError::InvalidLesson => RunnerError::LessonUnavailable,
                other => RunnerError::Session(other),
            }
        })
    }

    /// Play the tap cue for option and continue buttons.
    pub fn play_click(&self, settings: &AppSettings) {
        play_if_enabled(
            self.sounds.as_ref(),
            settings.sound_enabled(),
            SoundEvent::Click,
        );
    }

    /// Grade the pending answer, play the feedback cue and report the
    /// attempt in the background.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Session` when the session rejects the check.
    pub fn check_current(
        &self,
        session: &mut LessonSession,
        user_id: &UserId,
        settings: &AppSettings,
    ) -> Result<bool, RunnerError> {
        let correct = session.check_answer()?;

        play_if_enabled(
            self.sounds.as_ref(),
            settings.sound_enabled(),
            if correct {
                SoundEvent::Correct
            } else {
                SoundEvent::Error
            },
        );

        // The answer is guaranteed present once check_answer succeeded.
        if let (Some(exercise), Some(given)) =
            (session.current_exercise(), session.selected_answer())
        {
            let record = AttemptRecord::from_graded(
                user_id.clone(),
                session.lesson_id().clone(),
                session.languages().clone(),
                exercise,
                given,
                correct,
                self.clock.now(),
            );
            let recorder = Arc::clone(&self.recorder);
            tokio::spawn(async move {
                recorder.record(&record).await;
            });
        }

        Ok(correct)
    }

    /// Move the session forward. On completion, applies the lesson to the
    /// profile, pushes it to the sync endpoint and computes crossed
    /// milestones; sync failures are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Session` when the session rejects the
    /// transition.
    pub async fn advance(
        &self,
        session: &mut LessonSession,
        profile: &Profile,
        settings: &AppSettings,
    ) -> Result<RunnerAdvance, RunnerError> {
        match session.advance(self.clock.now())? {
            Advanced::Next => Ok(RunnerAdvance::Next),
            Advanced::OutOfHearts => Ok(RunnerAdvance::OutOfHearts),
            Advanced::Completed(summary) => {
                play_if_enabled(
                    self.sounds.as_ref(),
                    settings.sound_enabled(),
                    SoundEvent::Complete,
                );

                let updated =
                    profile.apply_completion(summary.lesson_id().clone(), summary.xp_earned());
                let milestones = milestones_crossed(profile, &updated);
                let reward_tier = RewardTier::for_lesson(summary.lesson_id());

                self.push_completion(&updated, &milestones).await;

                Ok(RunnerAdvance::Completed(Box::new(CompletionOutcome {
                    summary,
                    profile: updated,
                    milestones,
                    reward_tier,
                })))
            }
        }
    }

    /// Draw a gem amount for a finished lesson's mystery box.
    #[must_use]
    pub fn draw_reward(&self, tier: RewardTier) -> u32 {
        draw_reward(tier, &mut rand::rng())
    }

    async fn push_completion(&self, profile: &Profile, milestones: &[Milestone]) {
        let Some(sync) = &self.sync else {
            return;
        };

        let update = lingo_core::model::ProfileUpdate::from_profile(profile);
        if let Err(err) = sync.push_profile(profile.user_id(), &update).await {
            tracing::warn!(
                user_id = %profile.user_id(),
                error = %err,
                "profile push failed after lesson completion"
            );
        }

        for milestone in milestones {
            if let Err(err) = sync.report_milestone(profile.user_id(), *milestone).await {
                tracing::warn!(
                    user_id = %profile.user_id(),
                    milestone = %milestone.key(),
                    error = %err,
                    "milestone report failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NoopPlayer, PlaybackError};
    use lingo_core::model::{
        Answer, Exercise, ExerciseId, LanguagePair, Lesson, LessonId, UnitId,
    };
    use lingo_core::time::fixed_clock;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<SoundEvent>>,
    }

    impl SoundPlayer for RecordingPlayer {
        fn play(&self, event: SoundEvent) -> Result<(), PlaybackError> {
            self.played.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn lesson(id: &str, n: u64) -> Lesson {
        let exercises = (1..=n)
            .map(|i| {
                Exercise::translation(
                    ExerciseId::new(i),
                    format!("Q{i}"),
                    format!("A{i}"),
                    vec![format!("A{i}"), "x".into(), "y".into()],
                )
                .unwrap()
            })
            .collect();
        Lesson::new(
            LessonId::new(id),
            UnitId::new("greetings"),
            LanguagePair::new("en", "am"),
            "Greetings",
            exercises,
        )
        .unwrap()
    }

    fn query(id: &str) -> LessonQuery {
        LessonQuery {
            languages: LanguagePair::new("en", "am"),
            unit_id: UnitId::new("greetings"),
            lesson_id: LessonId::new(id),
        }
    }

    fn runner_with(repo: Arc<InMemoryRepository>) -> LessonRunner {
        let recorder = Arc::new(AttemptRecorder::new(None, repo.clone()));
        LessonRunner::new(
            repo,
            recorder,
            None,
            Arc::new(NoopPlayer),
            fixed_clock(),
            SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn missing_lesson_is_unavailable() {
        let repo = Arc::new(InMemoryRepository::new());
        let runner = runner_with(repo);

        let err = runner.start_lesson(&query("greetings-1")).await.unwrap_err();
        assert!(matches!(err, RunnerError::LessonUnavailable));
    }

    #[tokio::test]
    async fn empty_lesson_is_unavailable() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&lesson("greetings-1", 0)).await.unwrap();
        let runner = runner_with(repo);

        let err = runner.start_lesson(&query("greetings-1")).await.unwrap_err();
        assert!(matches!(err, RunnerError::LessonUnavailable));
    }

    #[tokio::test]
    async fn full_run_completes_and_updates_profile() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&lesson("greetings-1", 3)).await.unwrap();
        let runner = runner_with(repo.clone());

        let user = UserId::new("learner-1");
        let profile = Profile::new(user.clone());
        let settings = AppSettings::default();
        let mut session = runner.start_lesson(&query("greetings-1")).await.unwrap();

        for i in 0..3 {
            let expected = session.current_exercise().unwrap().expected_answer();
            session.select_answer(Answer::choice(expected));
            assert!(runner.check_current(&mut session, &user, &settings).unwrap());

            match runner.advance(&mut session, &profile, &settings).await.unwrap() {
                RunnerAdvance::Next => assert!(i < 2),
                RunnerAdvance::Completed(outcome) => {
                    assert_eq!(i, 2);
                    assert_eq!(outcome.summary.xp_earned(), 30);
                    assert_eq!(outcome.profile.xp(), 30);
                    assert!(outcome
                        .profile
                        .has_completed(&LessonId::new("greetings-1")));
                    assert_eq!(outcome.milestones, vec![Milestone::FirstLesson]);
                    assert_eq!(outcome.reward_tier, RewardTier::Lesson);
                }
                RunnerAdvance::OutOfHearts => panic!("unexpected heart exhaustion"),
            }
        }

        // Let the spawned attempt writes land in the fallback log.
        tokio::task::yield_now().await;
        assert_eq!(repo.logged_attempts().len(), 3);
    }

    #[tokio::test]
    async fn unit_final_lesson_gets_the_unit_tier() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&lesson("greetings-unit-final", 1))
            .await
            .unwrap();
        let runner = runner_with(repo);

        let user = UserId::new("learner-1");
        let profile = Profile::new(user.clone());
        let settings = AppSettings::default();
        let mut session = runner
            .start_lesson(&query("greetings-unit-final"))
            .await
            .unwrap();

        let expected = session.current_exercise().unwrap().expected_answer();
        session.select_answer(Answer::choice(expected));
        runner.check_current(&mut session, &user, &settings).unwrap();

        let RunnerAdvance::Completed(outcome) =
            runner.advance(&mut session, &profile, &settings).await.unwrap()
        else {
            panic!("expected completion");
        };
        assert_eq!(outcome.reward_tier, RewardTier::Unit);
    }

    #[tokio::test]
    async fn out_of_hearts_ends_without_completion() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_lesson(&lesson("greetings-1", 5)).await.unwrap();
        let recorder = Arc::new(AttemptRecorder::new(None, repo.clone()));
        let runner = LessonRunner::new(
            repo,
            recorder,
            None,
            Arc::new(NoopPlayer),
            fixed_clock(),
            SessionConfig {
                starting_hearts: 1,
                ..SessionConfig::default()
            },
        );

        let user = UserId::new("learner-1");
        let profile = Profile::new(user.clone());
        let settings = AppSettings::default();
        let mut session = runner.start_lesson(&query("greetings-1")).await.unwrap();

        session.select_answer(Answer::choice("wrong"));
        assert!(!runner.check_current(&mut session, &user, &settings).unwrap());
        assert!(matches!(
            runner.advance(&mut session, &profile, &settings).await.unwrap(),
            RunnerAdvance::Next
        ));

        session.select_answer(Answer::choice("wrong"));
        runner.check_current(&mut session, &user, &settings).unwrap();
        assert!(matches!(
            runner.advance(&mut session, &profile, &settings).await.unwrap(),
            RunnerAdvance::OutOfHearts
        ));
        assert!(!session.is_completed());
    }

    #[test]
    fn click_cue_honors_the_sound_setting() {
        let repo = Arc::new(InMemoryRepository::new());
        let recorder = Arc::new(AttemptRecorder::new(None, repo.clone()));
        let player = Arc::new(RecordingPlayer::default());
        let runner = LessonRunner::new(
            repo,
            recorder,
            None,
            player.clone(),
            fixed_clock(),
            SessionConfig::default(),
        );

        runner.play_click(&AppSettings::default());
        assert_eq!(*player.played.lock().unwrap(), vec![SoundEvent::Click]);

        runner.play_click(&AppSettings::default().with_sound_enabled(false));
        assert_eq!(*player.played.lock().unwrap(), vec![SoundEvent::Click]);
    }

    #[test]
    fn reward_draw_respects_the_tier() {
        let repo = Arc::new(InMemoryRepository::new());
        let recorder = Arc::new(AttemptRecorder::new(None, repo.clone()));
        let runner = LessonRunner::new(
            repo,
            recorder,
            None,
            Arc::new(NoopPlayer),
            fixed_clock(),
            SessionConfig::default(),
        );

        for _ in 0..50 {
            let amount = runner.draw_reward(RewardTier::Section);
            assert!((100..=500).contains(&amount));
        }
    }
}
