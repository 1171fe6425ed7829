use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{LessonRepository, StorageError};
use lingo_core::model::{
    LanguagePair, Lesson, LessonId, LessonOverview, LessonQuery, UnitId,
};

use super::SqliteRepository;
use super::mapping::{exercise_id_to_i64, exercise_payload, map_exercise_row, ser};

#[async_trait]
impl LessonRepository for SqliteRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO lessons (lesson_id, native_lang, learning_lang, unit_id, title, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(lesson_id, native_lang, learning_lang) DO UPDATE SET
                unit_id = excluded.unit_id,
                title = excluded.title
            ",
        )
        .bind(lesson.id().as_str())
        .bind(&lesson.languages().native)
        .bind(&lesson.languages().learning)
        .bind(lesson.unit_id().as_str())
        .bind(lesson.title())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        // Replace the exercise rows wholesale; a lesson is authored as a unit.
        sqlx::query(
            r"
            DELETE FROM exercises
            WHERE lesson_id = ?1 AND native_lang = ?2 AND learning_lang = ?3
            ",
        )
        .bind(lesson.id().as_str())
        .bind(&lesson.languages().native)
        .bind(&lesson.languages().learning)
        .execute(&mut *tx)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (position, exercise) in lesson.exercises().iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                INSERT INTO exercises
                    (lesson_id, native_lang, learning_lang, position, exercise_id, kind, payload)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(lesson.id().as_str())
            .bind(&lesson.languages().native)
            .bind(&lesson.languages().learning)
            .bind(position)
            .bind(exercise_id_to_i64(exercise.id())?)
            .bind(exercise.kind().to_string())
            .bind(exercise_payload(exercise)?)
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn get_lesson(&self, query: &LessonQuery) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT unit_id, title
            FROM lessons
            WHERE lesson_id = ?1 AND native_lang = ?2 AND learning_lang = ?3 AND unit_id = ?4
            ",
        )
        .bind(query.lesson_id.as_str())
        .bind(&query.languages.native)
        .bind(&query.languages.learning)
        .bind(query.unit_id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let unit_id: String = row.try_get("unit_id").map_err(ser)?;
        let title: String = row.try_get("title").map_err(ser)?;

        let exercise_rows = sqlx::query(
            r"
            SELECT exercise_id, payload
            FROM exercises
            WHERE lesson_id = ?1 AND native_lang = ?2 AND learning_lang = ?3
            ORDER BY position
            ",
        )
        .bind(query.lesson_id.as_str())
        .bind(&query.languages.native)
        .bind(&query.languages.learning)
        .fetch_all(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let exercises = exercise_rows
            .iter()
            .map(map_exercise_row)
            .collect::<Result<Vec<_>, _>>()?;

        let lesson = Lesson::new(
            query.lesson_id.clone(),
            UnitId::new(unit_id),
            query.languages.clone(),
            title,
            exercises,
        )
        .map_err(ser)?;

        Ok(Some(lesson))
    }

    async fn list_lessons(
        &self,
        languages: &LanguagePair,
        unit_id: &UnitId,
    ) -> Result<Vec<LessonOverview>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                l.lesson_id,
                l.title,
                COUNT(e.position) AS exercise_count
            FROM lessons l
            LEFT JOIN exercises e
                ON e.lesson_id = l.lesson_id
                AND e.native_lang = l.native_lang
                AND e.learning_lang = l.learning_lang
            WHERE l.native_lang = ?1 AND l.learning_lang = ?2 AND l.unit_id = ?3
            GROUP BY l.lesson_id, l.title
            ORDER BY l.lesson_id
            ",
        )
        .bind(&languages.native)
        .bind(&languages.learning)
        .bind(unit_id.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        rows.iter()
            .map(|row| {
                let lesson_id: String = row.try_get("lesson_id").map_err(ser)?;
                let title: String = row.try_get("title").map_err(ser)?;
                let count: i64 = row.try_get("exercise_count").map_err(ser)?;
                Ok(LessonOverview {
                    id: LessonId::new(lesson_id),
                    unit_id: unit_id.clone(),
                    title,
                    exercise_count: usize::try_from(count).unwrap_or(0),
                })
            })
            .collect()
    }
}
