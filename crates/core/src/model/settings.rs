use serde::{Deserialize, Serialize};

/// Global learner preferences, persisted outside any session.
///
/// Read once at session start and passed in explicitly; the setter returns
/// the new value instead of mutating shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    sound_enabled: bool,
}

impl AppSettings {
    #[must_use]
    pub fn from_persisted(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Returns the settings with the sound preference replaced.
    #[must_use]
    pub fn with_sound_enabled(self, sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}
