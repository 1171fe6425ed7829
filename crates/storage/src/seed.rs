//! Starter content: a small English → Amharic greetings unit.
//!
//! Used by the `seed` binary and the app's `seed` subcommand so a fresh
//! database has something to practice on. Idempotent: lessons are upserted
//! by id.

use thiserror::Error;

use lingo_core::model::{
    Exercise, ExerciseError, ExerciseId, LanguagePair, Lesson, LessonError, LessonId,
    MatchingPair, UnitId,
};

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn opts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// The greetings unit, three lessons deep.
///
/// # Errors
///
/// Returns `SeedError` if the content fails builder validation.
pub fn starter_lessons(languages: &LanguagePair) -> Result<Vec<Lesson>, SeedError> {
    let unit = UnitId::new("greetings");

    let lesson_one = Lesson::new(
        LessonId::new("greetings-1"),
        unit.clone(),
        languages.clone(),
        "First words",
        vec![
            Exercise::translation(
                ExerciseId::new(1),
                "Hello",
                "Selam",
                opts(&["Selam", "Awo", "Aydelem", "Ameseginalehu"]),
            )?,
            Exercise::multiple_choice(
                ExerciseId::new(2),
                "Which one means \"Yes\"?",
                "Awo",
                opts(&["Awo", "Aydelem", "Selam"]),
            )?,
            Exercise::fill_blank(
                ExerciseId::new(3),
                "___ means thank you",
                "Ameseginalehu",
                opts(&["Ameseginalehu", "Selam", "Awo"]),
            )?,
            Exercise::matching(
                ExerciseId::new(4),
                vec![
                    MatchingPair::new("Hello", "Selam"),
                    MatchingPair::new("Yes", "Awo"),
                    MatchingPair::new("No", "Aydelem"),
                ],
            )?,
        ],
    )?;

    let lesson_two = Lesson::new(
        LessonId::new("greetings-2"),
        unit.clone(),
        languages.clone(),
        "How are you?",
        vec![
            Exercise::translation(
                ExerciseId::new(5),
                "How are you?",
                "Dehna neh?",
                opts(&["Dehna neh?", "Selam", "Ameseginalehu"]),
            )?,
            Exercise::multiple_choice(
                ExerciseId::new(6),
                "Which one means \"I am fine\"?",
                "Dehna negn",
                opts(&["Dehna negn", "Awo", "Aydelem"]),
            )?,
            Exercise::fill_blank(
                ExerciseId::new(7),
                "___ means goodbye",
                "Dehna hun",
                opts(&["Dehna hun", "Dehna neh?", "Selam"]),
            )?,
        ],
    )?;

    let unit_final = Lesson::new(
        LessonId::new("greetings-unit-final"),
        unit,
        languages.clone(),
        "Greetings checkpoint",
        vec![
            Exercise::translation(
                ExerciseId::new(8),
                "Thank you",
                "Ameseginalehu",
                opts(&["Ameseginalehu", "Dehna hun", "Awo"]),
            )?,
            Exercise::matching(
                ExerciseId::new(9),
                vec![
                    MatchingPair::new("How are you?", "Dehna neh?"),
                    MatchingPair::new("I am fine", "Dehna negn"),
                    MatchingPair::new("Goodbye", "Dehna hun"),
                ],
            )?,
        ],
    )?;

    Ok(vec![lesson_one, lesson_two, unit_final])
}

/// Upsert the starter unit into the given store.
///
/// # Errors
///
/// Returns `SeedError` when content validation or persistence fails.
pub async fn seed_starter_unit(
    storage: &Storage,
    languages: &LanguagePair,
) -> Result<usize, SeedError> {
    let lessons = starter_lessons(languages)?;
    for lesson in &lessons {
        storage.lessons.upsert_lesson(lesson).await?;
    }
    Ok(lessons.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let storage = Storage::in_memory();
        let languages = LanguagePair::new("en", "am");

        let first = seed_starter_unit(&storage, &languages).await.unwrap();
        let second = seed_starter_unit(&storage, &languages).await.unwrap();
        assert_eq!(first, 3);
        assert_eq!(second, 3);

        let listed = storage
            .lessons
            .list_lessons(&languages, &UnitId::new("greetings"))
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
    }
}
