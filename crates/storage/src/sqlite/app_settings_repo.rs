use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{AppSettingsRepository, StorageError};
use lingo_core::model::AppSettings;

use super::SqliteRepository;
use super::mapping::ser;

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT sound_enabled
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sound_enabled: i64 = row.try_get("sound_enabled").map_err(ser)?;
        Ok(Some(AppSettings::from_persisted(sound_enabled != 0)))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, sound_enabled)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET
                sound_enabled = excluded.sound_enabled
            ",
        )
        .bind(i64::from(settings.sound_enabled()))
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
