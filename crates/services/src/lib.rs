#![forbid(unsafe_code)]

pub mod audio;
pub mod error;
pub mod reward;
pub mod runner;
pub mod session;
pub mod settings_service;
pub mod sync;

pub use lingo_core::time::Clock;

pub use audio::{NoopPlayer, SoundEvent, SoundPlayer, play_if_enabled};
pub use error::{RunnerError, SessionError, SettingsServiceError, SyncError};
pub use reward::draw_reward;
pub use runner::{CompletionOutcome, LessonRunner, RunnerAdvance};
pub use session::{Advanced, LessonSession, SessionConfig, SessionState};
pub use settings_service::AppSettingsService;
pub use sync::{AttemptRecorder, HttpProfileSync, ProfileSync, SyncConfig};
