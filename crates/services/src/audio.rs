//! Feedback sounds.
//!
//! Sound is a side collaborator of the session flow: a failed playback must
//! never affect grading or navigation, so every error stops here.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("audio backend unavailable: {0}")]
    Backend(String),
}

/// Cues the session flow can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Correct,
    Error,
    Complete,
    Click,
}

/// Playback backend boundary. Implementations live at the app edge.
pub trait SoundPlayer: Send + Sync {
    /// # Errors
    ///
    /// Returns `PlaybackError` when the backend cannot play the cue.
    fn play(&self, event: SoundEvent) -> Result<(), PlaybackError>;
}

/// Silent backend for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlayer;

impl SoundPlayer for NoopPlayer {
    fn play(&self, _event: SoundEvent) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Play a cue if sound is enabled; playback errors are logged and dropped.
pub fn play_if_enabled(player: &dyn SoundPlayer, enabled: bool, event: SoundEvent) {
    if !enabled {
        return;
    }
    if let Err(err) = player.play(event) {
        tracing::debug!(?event, error = %err, "sound playback failed");
    }
}
