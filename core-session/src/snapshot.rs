//! The session's read surface.

use crate::queue::RepeatMode;
use core_library::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifecycle state. Owned exclusively by the controller; it only ever
/// changes inside the controller's command handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track has been loaded.
    Idle,
    /// A load is in flight.
    Loading,
    Playing,
    Paused,
    /// The last load or decode failed; the failed track stays visible.
    Error,
}

/// Complete, self-sufficient projection of the session.
///
/// Observers must treat this as the only readable state: change notifications
/// carry no payload, so every notification means "re-fetch the full snapshot".
/// Caching individual fields across events recreates the inconsistent partial
/// views this type exists to prevent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current track, retained even in the `Error` state so UIs can show what
    /// failed to play.
    pub track: Option<Track>,
    pub state: PlaybackState,
    /// Playback position within the current track.
    pub position: Duration,
    /// Duration of the current track; zero while nothing is loaded.
    pub duration: Duration,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl SessionSnapshot {
    /// Snapshot of a session that has never loaded anything.
    pub fn empty() -> Self {
        Self {
            track: None,
            state: PlaybackState::Idle,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}
