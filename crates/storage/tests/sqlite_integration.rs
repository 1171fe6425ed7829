use lingo_core::model::{
    Answer, AppSettings, AttemptRecord, Exercise, ExerciseId, LanguagePair, Lesson, LessonId,
    LessonQuery, MatchingPair, UnitId, UserId,
};
use lingo_core::time::fixed_now;
use storage::repository::Storage;

fn opts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn build_lesson(languages: &LanguagePair) -> Lesson {
    Lesson::new(
        LessonId::new("greetings-1"),
        UnitId::new("greetings"),
        languages.clone(),
        "First words",
        vec![
            Exercise::translation(
                ExerciseId::new(1),
                "Hello",
                "Selam",
                opts(&["Selam", "Awo", "Aydelem"]),
            )
            .unwrap(),
            Exercise::multiple_choice(
                ExerciseId::new(2),
                "Which one means \"Yes\"?",
                "Awo",
                opts(&["Awo", "Aydelem"]),
            )
            .unwrap(),
            Exercise::fill_blank(
                ExerciseId::new(3),
                "___ means thank you",
                "Ameseginalehu",
                opts(&["Ameseginalehu", "Selam"]),
            )
            .unwrap(),
            Exercise::matching(
                ExerciseId::new(4),
                vec![
                    MatchingPair::new("Hello", "Selam"),
                    MatchingPair::new("Yes", "Awo"),
                ],
            )
            .unwrap(),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn lesson_round_trips_with_all_exercise_kinds() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let languages = LanguagePair::new("en", "am");
    let lesson = build_lesson(&languages);

    storage.lessons.upsert_lesson(&lesson).await.unwrap();

    let query = LessonQuery {
        languages: languages.clone(),
        unit_id: UnitId::new("greetings"),
        lesson_id: LessonId::new("greetings-1"),
    };
    let fetched = storage.lessons.get_lesson(&query).await.unwrap().unwrap();

    assert_eq!(fetched, lesson);
    // Order preserved through the position column.
    assert_eq!(fetched.exercises()[0].id(), ExerciseId::new(1));
    assert_eq!(fetched.exercises()[3].id(), ExerciseId::new(4));
}

#[tokio::test]
async fn missing_lesson_is_none() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let query = LessonQuery {
        languages: LanguagePair::new("en", "am"),
        unit_id: UnitId::new("greetings"),
        lesson_id: LessonId::new("does-not-exist"),
    };
    assert!(storage.lessons.get_lesson(&query).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_replaces_exercises() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let languages = LanguagePair::new("en", "am");
    let lesson = build_lesson(&languages);
    storage.lessons.upsert_lesson(&lesson).await.unwrap();

    let trimmed = Lesson::new(
        lesson.id().clone(),
        lesson.unit_id().clone(),
        languages.clone(),
        "First words (revised)",
        vec![lesson.exercises()[0].clone()],
    )
    .unwrap();
    storage.lessons.upsert_lesson(&trimmed).await.unwrap();

    let query = LessonQuery {
        languages,
        unit_id: UnitId::new("greetings"),
        lesson_id: lesson.id().clone(),
    };
    let fetched = storage.lessons.get_lesson(&query).await.unwrap().unwrap();
    assert_eq!(fetched.title(), "First words (revised)");
    assert_eq!(fetched.exercises().len(), 1);
}

#[tokio::test]
async fn listing_counts_exercises() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let languages = LanguagePair::new("en", "am");
    storage
        .lessons
        .upsert_lesson(&build_lesson(&languages))
        .await
        .unwrap();

    let listed = storage
        .lessons
        .list_lessons(&languages, &UnitId::new("greetings"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].exercise_count, 4);
}

#[tokio::test]
async fn attempt_insert_is_idempotent_by_id() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
    let languages = LanguagePair::new("en", "am");
    let lesson = build_lesson(&languages);
    let exercise = &lesson.exercises()[0];
    let given = Answer::choice("Awo");

    let record = AttemptRecord::from_graded(
        UserId::new("learner"),
        lesson.id().clone(),
        languages,
        exercise,
        &given,
        exercise.grade(&given),
        fixed_now(),
    );

    storage.attempts.insert_attempt(&record).await.unwrap();
    // A retried write with the same id must not fail.
    storage.attempts.insert_attempt(&record).await.unwrap();
}

#[tokio::test]
async fn settings_round_trip() {
    let storage = Storage::sqlite("sqlite::memory:").await.unwrap();

    assert!(storage.settings.get_settings().await.unwrap().is_none());

    let muted = AppSettings::default().with_sound_enabled(false);
    storage.settings.save_settings(&muted).await.unwrap();

    let loaded = storage.settings.get_settings().await.unwrap().unwrap();
    assert!(!loaded.sound_enabled());
}
