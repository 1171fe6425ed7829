use async_trait::async_trait;

use crate::repository::{AttemptLogRepository, StorageError};
use lingo_core::model::AttemptRecord;

use super::SqliteRepository;

#[async_trait]
impl AttemptLogRepository for SqliteRepository {
    async fn insert_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError> {
        let exercise_id = i64::try_from(record.exercise_id.value())
            .map_err(|_| StorageError::Serialization("exercise_id overflow".into()))?;

        sqlx::query(
            r"
            INSERT INTO attempt_log (
                id,
                user_id,
                exercise_id,
                lesson_id,
                native_lang,
                learning_lang,
                kind,
                question,
                expected_answer,
                given_answer,
                is_correct,
                answered_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.as_str())
        .bind(exercise_id)
        .bind(record.lesson_id.as_str())
        .bind(&record.languages.native)
        .bind(&record.languages.learning)
        .bind(record.kind.to_string())
        .bind(&record.question)
        .bind(&record.expected_answer)
        .bind(&record.given_answer)
        .bind(i64::from(record.is_correct))
        .bind(record.answered_at)
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
