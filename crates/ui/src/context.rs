use std::sync::{Arc, Mutex};

use lingo_core::model::{LanguagePair, Profile, UnitId, UserId};
use services::{AppSettingsService, LessonRunner};

/// What the composition root must provide before the UI can launch.
pub trait UiApp: Send + Sync {
    fn user_id(&self) -> UserId;
    fn languages(&self) -> LanguagePair;
    fn current_unit(&self) -> UnitId;
    fn initial_profile(&self) -> Profile;

    fn runner(&self) -> Arc<LessonRunner>;
    fn settings(&self) -> Arc<AppSettingsService>;
}

#[derive(Clone)]
pub struct AppContext {
    user_id: UserId,
    languages: LanguagePair,
    current_unit: UnitId,
    profile: Arc<Mutex<Profile>>,

    runner: Arc<LessonRunner>,
    settings: Arc<AppSettingsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user_id: app.user_id(),
            languages: app.languages(),
            current_unit: app.current_unit(),
            profile: Arc::new(Mutex::new(app.initial_profile())),
            runner: app.runner(),
            settings: app.settings(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    #[must_use]
    pub fn languages(&self) -> LanguagePair {
        self.languages.clone()
    }

    #[must_use]
    pub fn current_unit(&self) -> UnitId {
        self.current_unit.clone()
    }

    /// Latest profile snapshot, updated after each completed lesson.
    #[must_use]
    pub fn profile(&self) -> Profile {
        self.profile
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn store_profile(&self, profile: Profile) {
        match self.profile.lock() {
            Ok(mut guard) => *guard = profile,
            Err(poisoned) => *poisoned.into_inner() = profile,
        }
    }

    #[must_use]
    pub fn runner(&self) -> Arc<LessonRunner> {
        Arc::clone(&self.runner)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.settings)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
