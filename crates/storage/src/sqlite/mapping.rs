use lingo_core::model::{Exercise, ExerciseBody, ExerciseId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn exercise_id_from_i64(v: i64) -> Result<ExerciseId, StorageError> {
    u64::try_from(v)
        .map(ExerciseId::new)
        .map_err(|_| StorageError::Serialization("exercise_id sign overflow".into()))
}

pub(crate) fn exercise_id_to_i64(id: ExerciseId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("exercise_id overflow".into()))
}

/// Serialize the exercise body as the JSON payload column.
pub(crate) fn exercise_payload(exercise: &Exercise) -> Result<String, StorageError> {
    serde_json::to_string(exercise.body()).map_err(ser)
}

/// Decode one `exercises` row back into a domain exercise, re-running the
/// construction invariants.
pub(crate) fn map_exercise_row(row: &sqlx::sqlite::SqliteRow) -> Result<Exercise, StorageError> {
    let id = exercise_id_from_i64(row.try_get::<i64, _>("exercise_id").map_err(ser)?)?;
    let payload: String = row.try_get("payload").map_err(ser)?;
    let body: ExerciseBody = serde_json::from_str(&payload).map_err(ser)?;
    Exercise::from_persisted(id, body).map_err(ser)
}
