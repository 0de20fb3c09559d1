//! Audio engine bridge trait and supporting source types.
//!
//! These abstractions let the playback layer drive a platform audio engine
//! while preserving a consistent, async-first API surface. Host applications
//! provide concrete implementations that satisfy their platform constraints;
//! the core ships a clock-paced reference backend for headless use.

use crate::error::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Playable locator handed to the audio engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioSource {
    /// Local file accessible to the host runtime.
    LocalFile { path: PathBuf },
    /// In-memory audio buffer supplied by the caller.
    MemoryBuffer { data: Bytes },
}

impl AudioSource {
    /// Short human-readable description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            AudioSource::LocalFile { path } => path.display().to_string(),
            AudioSource::MemoryBuffer { data } => format!("memory buffer ({} bytes)", data.len()),
        }
    }
}

/// Asynchronous signals emitted by an [`AudioBackend`].
///
/// `Completed` fires exactly once when the loaded source plays to its natural
/// end (never on pause or seek). Mid-playback decode failures surface
/// as `Failed`, which is a distinct signal, not a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The loaded source finished playing to its end.
    Completed,
    /// Decoding or rendering failed mid-playback.
    Failed { message: String },
}

/// Receiver half of a backend's event stream.
pub type BackendEvents = mpsc::UnboundedReceiver<BackendEvent>;

/// Trait for host audio engines that decode and render one source at a time.
///
/// Loading a new source implicitly discards whatever was loaded before; there
/// is no explicit unload. Control calls operate on the currently loaded source
/// and may assume one is present; the playback layer guards the
/// nothing-loaded cases before delegating.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Open and prepare a source, discarding any prior one (including an
    /// in-flight load). Returns the probed duration of the new source.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be opened or its format cannot be decoded.
    async fn load(&self, source: AudioSource) -> Result<Duration>;

    /// Begin or resume playback. Idempotent while already playing.
    async fn play(&self) -> Result<()>;

    /// Pause playback, preserving position. Idempotent while paused.
    async fn pause(&self) -> Result<()>;

    /// Jump to an absolute position within the loaded source.
    ///
    /// Positions past the end are the caller's responsibility to clamp; the
    /// playback layer does so before delegating.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Current playback position within the loaded source.
    async fn position(&self) -> Result<Duration>;

    /// Whether audio is currently advancing.
    async fn is_playing(&self) -> Result<bool>;

    /// Hand over the backend's event stream. Yields `Some` exactly once; later
    /// calls return `None`. The consumer owns the receiver for the backend's
    /// lifetime.
    fn take_events(&self) -> Option<BackendEvents>;
}
