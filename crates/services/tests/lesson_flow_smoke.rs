use std::sync::Arc;

use async_trait::async_trait;
use lingo_core::model::{
    Answer, AppSettings, AttemptRecord, Exercise, ExerciseId, LanguagePair, Lesson,
    LessonId, LessonQuery, Milestone, Profile, ProfileUpdate, UnitId, UserId,
};
use lingo_core::time::fixed_clock;
use services::{
    AttemptRecorder, LessonRunner, NoopPlayer, ProfileSync, RunnerAdvance,
    SessionConfig, SyncError,
};
use storage::repository::Storage;

struct UnreachableSync;

#[async_trait]
impl ProfileSync for UnreachableSync {
    async fn record_attempt(&self, _: &AttemptRecord) -> Result<(), SyncError> {
        Err(SyncError::Disabled)
    }

    async fn push_profile(&self, _: &UserId, _: &ProfileUpdate) -> Result<(), SyncError> {
        Err(SyncError::Disabled)
    }

    async fn report_milestone(&self, _: &UserId, _: Milestone) -> Result<(), SyncError> {
        Err(SyncError::Disabled)
    }
}

fn greetings_lesson() -> Lesson {
    let exercises = vec![
        Exercise::translation(
            ExerciseId::new(1),
            "Hello",
            "Selam",
            vec!["Selam".into(), "Awo".into(), "Aydelem".into()],
        )
        .unwrap(),
        Exercise::multiple_choice(
            ExerciseId::new(2),
            "How do you say \"Yes\"?",
            "Awo",
            vec!["Awo".into(), "Aydelem".into(), "Selam".into()],
        )
        .unwrap(),
        Exercise::fill_blank(
            ExerciseId::new(3),
            "___ neh?",
            "Dehna",
            vec!["Dehna".into(), "Awo".into(), "Selam".into()],
        )
        .unwrap(),
    ];
    Lesson::new(
        LessonId::new("greetings-1"),
        UnitId::new("greetings"),
        LanguagePair::new("en", "am"),
        "Greetings",
        exercises,
    )
    .unwrap()
}

#[tokio::test]
async fn offline_lesson_run_lands_attempts_in_the_local_log() {
    let storage = Storage::sqlite("sqlite:file:memdb_lesson_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    storage
        .lessons
        .upsert_lesson(&greetings_lesson())
        .await
        .expect("seed lesson");

    // Remote sync is up for profile pushes in name only: every call fails,
    // so attempts must land in the local attempt log instead.
    let sync: Arc<dyn ProfileSync> = Arc::new(UnreachableSync);
    let recorder = Arc::new(AttemptRecorder::new(
        Some(Arc::clone(&sync)),
        Arc::clone(&storage.attempts),
    ));
    let runner = LessonRunner::new(
        Arc::clone(&storage.lessons),
        recorder,
        Some(sync),
        Arc::new(NoopPlayer),
        fixed_clock(),
        SessionConfig::default(),
    );

    let user = UserId::new("learner-1");
    let profile = Profile::new(user.clone());
    let settings = AppSettings::default();
    let query = LessonQuery {
        languages: LanguagePair::new("en", "am"),
        unit_id: UnitId::new("greetings"),
        lesson_id: LessonId::new("greetings-1"),
    };

    let mut session = runner.start_lesson(&query).await.expect("start session");
    assert_eq!(session.total_exercises(), 3);

    let mut completed = None;
    for _ in 0..3 {
        let expected = session.current_exercise().expect("exercise").expected_answer();
        session.select_answer(Answer::choice(expected));
        assert!(runner
            .check_current(&mut session, &user, &settings)
            .expect("check"));

        match runner
            .advance(&mut session, &profile, &settings)
            .await
            .expect("advance")
        {
            RunnerAdvance::Next => {}
            RunnerAdvance::Completed(outcome) => completed = Some(outcome),
            RunnerAdvance::OutOfHearts => panic!("no wrong answers were given"),
        }
    }

    let outcome = completed.expect("session completed");
    assert_eq!(outcome.summary.xp_earned(), 30);
    assert_eq!(outcome.summary.hearts_left(), 3);
    assert_eq!(outcome.milestones, vec![Milestone::FirstLesson]);
    assert!(outcome.profile.has_completed(&LessonId::new("greetings-1")));

    // Attempt writes are spawned; give them a moment to settle.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn lesson_list_shows_seeded_content() {
    let storage = Storage::sqlite("sqlite:file:memdb_lesson_list?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    storage
        .lessons
        .upsert_lesson(&greetings_lesson())
        .await
        .expect("seed lesson");

    let recorder = Arc::new(AttemptRecorder::new(None, Arc::clone(&storage.attempts)));
    let runner = LessonRunner::new(
        Arc::clone(&storage.lessons),
        recorder,
        None,
        Arc::new(NoopPlayer),
        fixed_clock(),
        SessionConfig::default(),
    );

    let overviews = runner
        .available_lessons(&LanguagePair::new("en", "am"), &UnitId::new("greetings"))
        .await
        .expect("list");
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].title, "Greetings");
    assert_eq!(overviews[0].exercise_count, 3);
}
