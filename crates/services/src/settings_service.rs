use std::sync::Arc;

use lingo_core::model::AppSettings;
use storage::repository::AppSettingsRepository;

use crate::error::SettingsServiceError;

/// Loads and persists app-level settings.
///
/// The UI is handed an explicit [`AppSettings`] value rather than reading
/// ambient state; this service is the only place that value comes from.
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Current settings, or the defaults when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` for storage failures.
    pub async fn load(&self) -> Result<AppSettings, SettingsServiceError> {
        Ok(self.repo.get_settings().await?.unwrap_or_default())
    }

    /// Persist the sound preference and return the settings now in effect.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` for storage failures.
    pub async fn set_sound_enabled(
        &self,
        enabled: bool,
    ) -> Result<AppSettings, SettingsServiceError> {
        let settings = self.load().await?.with_sound_enabled(enabled);
        self.repo.save_settings(&settings).await?;
        Ok(settings)
    }
}
