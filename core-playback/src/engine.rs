//! # Player Engine
//!
//! The adapter between the session controller and a host audio backend.
//!
//! The engine owns exactly one [`AudioBackend`] and guards the contract the
//! session relies on: one source in flight at a time (a new `load` supersedes
//! the previous source), control calls fail with [`PlaybackError::NoTrackLoaded`]
//! when nothing is loaded, seeks are clamped into `[0, duration]`, and
//! position/duration read as zero while unloaded. Backend completion and
//! failure signals are re-emitted on the engine's own event stream so the
//! controller can marshal them into its command mailbox.

use crate::error::{PlaybackError, Result};
use bridge_traits::playback::{AudioBackend, AudioSource, BackendEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Signals the engine forwards to the session controller.
#[derive(Debug)]
pub enum EngineEvent {
    /// The loaded source played to its natural end. Emitted exactly once per
    /// source; never on pause or seek.
    Completed,
    /// Decoding failed mid-playback. Distinct from completion; the session
    /// must not auto-advance on this.
    Failed(PlaybackError),
}

/// Receiver half of the engine's event stream.
pub type EngineEvents = mpsc::UnboundedReceiver<EngineEvent>;

/// Decoding-engine adapter owning a single backend.
pub struct PlayerEngine {
    backend: Box<dyn AudioBackend>,
    /// Duration of the currently loaded source; `None` while unloaded.
    loaded_duration: Option<Duration>,
    events: Option<EngineEvents>,
}

impl PlayerEngine {
    /// Wrap a backend and start forwarding its event stream.
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        match backend.take_events() {
            Some(mut backend_events) => {
                tokio::spawn(async move {
                    while let Some(event) = backend_events.recv().await {
                        let mapped = match event {
                            BackendEvent::Completed => EngineEvent::Completed,
                            BackendEvent::Failed { message } => {
                                EngineEvent::Failed(PlaybackError::DecodingError(message))
                            }
                        };
                        if tx.send(mapped).is_err() {
                            break;
                        }
                    }
                });
            }
            None => warn!("Backend event stream already taken; engine will see no signals"),
        }

        Self {
            backend,
            loaded_duration: None,
            events: Some(rx),
        }
    }

    /// Hand over the engine's event stream. Yields `Some` exactly once.
    pub fn take_events(&mut self) -> Option<EngineEvents> {
        self.events.take()
    }

    /// Whether a source is currently loaded.
    pub fn has_source(&self) -> bool {
        self.loaded_duration.is_some()
    }

    /// Load a source, implicitly discarding any prior one (including an
    /// in-flight load; superseding is the backend's one-source contract).
    ///
    /// # Errors
    ///
    /// Fails with a load-failure kind when the source cannot be opened or
    /// decoded; the engine is left with no loaded source in that case.
    pub async fn load(&mut self, source: AudioSource) -> Result<Duration> {
        info!(source = %source.describe(), "Loading source");

        // Forget the old source up front so a failed load leaves the engine
        // cleanly unloaded rather than pointing at the superseded source.
        self.loaded_duration = None;

        let duration = self
            .backend
            .load(source)
            .await
            .map_err(|e| PlaybackError::SourceError(e.to_string()))?;

        self.loaded_duration = Some(duration);
        debug!(?duration, "Source loaded");
        Ok(duration)
    }

    /// Begin or resume playback. Idempotent while already playing.
    pub async fn play(&mut self) -> Result<()> {
        if !self.has_source() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.backend.play().await?;
        Ok(())
    }

    /// Pause playback, preserving position. Idempotent while paused.
    pub async fn pause(&mut self) -> Result<()> {
        if !self.has_source() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.backend.pause().await?;
        Ok(())
    }

    /// Seek to an absolute position, clamped into `[0, duration]`.
    pub async fn seek(&mut self, position: Duration) -> Result<()> {
        let Some(duration) = self.loaded_duration else {
            return Err(PlaybackError::NoTrackLoaded);
        };
        let clamped = position.min(duration);
        if clamped != position {
            debug!(?position, ?clamped, "Clamped seek target");
        }
        self.backend.seek(clamped).await?;
        Ok(())
    }

    /// Current position; zero while nothing is loaded.
    pub async fn position(&self) -> Result<Duration> {
        if !self.has_source() {
            return Ok(Duration::ZERO);
        }
        Ok(self.backend.position().await?)
    }

    /// Duration of the loaded source; zero while nothing is loaded.
    pub fn duration(&self) -> Duration {
        self.loaded_duration.unwrap_or(Duration::ZERO)
    }

    /// Whether audio is currently advancing.
    pub async fn is_playing(&self) -> Result<bool> {
        if !self.has_source() {
            return Ok(false);
        }
        Ok(self.backend.is_playing().await?)
    }
}
