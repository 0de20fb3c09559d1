//! # Clock-Paced Local Backend
//!
//! Reference [`AudioBackend`] for headless use: sources are validated and
//! probed with Symphonia at load, then playback is paced on the Tokio clock.
//! Position derives from a play/pause ledger over `tokio::time::Instant`, and
//! completion fires through an armed timer when the paced position reaches the
//! probed duration. Rendering to an actual device is a host concern; desktop
//! shells supply their own backend wired to a real output.

use crate::probe::SourceProbe;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::playback::{AudioBackend, AudioSource, BackendEvent, BackendEvents};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

struct PacerState {
    /// Bumped on every load/play/pause/seek/completion; an armed timer only
    /// fires when its captured generation is still current, which silences
    /// timers superseded by later control calls.
    generation: u64,
    duration: Duration,
    /// Position accumulated up to the last play/pause/seek boundary.
    base: Duration,
    /// Set while the paced clock is advancing.
    playing_since: Option<Instant>,
    loaded: bool,
}

impl PacerState {
    fn position(&self) -> Duration {
        let elapsed = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.base + elapsed).min(self.duration)
    }
}

/// Clock-paced backend over Symphonia-probed sources.
pub struct LocalFileBackend {
    state: Arc<Mutex<PacerState>>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    events: Mutex<Option<BackendEvents>>,
}

impl LocalFileBackend {
    pub fn new() -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(Mutex::new(PacerState {
                generation: 0,
                duration: Duration::ZERO,
                base: Duration::ZERO,
                playing_since: None,
                loaded: false,
            })),
            event_tx,
            events: Mutex::new(Some(events)),
        }
    }

    /// Arm the completion timer for the current play run.
    fn arm_completion(&self, generation: u64, remaining: Duration) {
        let state = Arc::clone(&self.state);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let mut s = state.lock();
            if s.generation != generation || s.playing_since.is_none() {
                return;
            }
            s.base = s.duration;
            s.playing_since = None;
            s.generation += 1;
            debug!("Paced source reached its end");
            let _ = tx.send(BackendEvent::Completed);
        });
    }
}

impl Default for LocalFileBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioBackend for LocalFileBackend {
    async fn load(&self, source: AudioSource) -> Result<Duration> {
        let described = source.describe();
        let probe = tokio::task::spawn_blocking(move || SourceProbe::probe(&source))
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Probe task failed: {}", e)))?
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        let duration = probe.duration.ok_or_else(|| {
            BridgeError::OperationFailed(format!(
                "Source {} reports no duration; cannot pace playback",
                described
            ))
        })?;

        let mut s = self.state.lock();
        s.generation += 1;
        s.duration = duration;
        s.base = Duration::ZERO;
        s.playing_since = None;
        s.loaded = true;
        info!(source = %described, ?duration, codec = ?probe.codec, "Loaded source");
        Ok(duration)
    }

    async fn play(&self) -> Result<()> {
        let (generation, remaining) = {
            let mut s = self.state.lock();
            if !s.loaded {
                return Err(BridgeError::OperationFailed("Nothing loaded".to_string()));
            }
            if s.playing_since.is_some() {
                return Ok(());
            }
            s.generation += 1;
            s.playing_since = Some(Instant::now());
            (s.generation, s.duration.saturating_sub(s.base))
        };
        self.arm_completion(generation, remaining);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut s = self.state.lock();
        if !s.loaded {
            return Err(BridgeError::OperationFailed("Nothing loaded".to_string()));
        }
        if let Some(since) = s.playing_since.take() {
            s.base = (s.base + since.elapsed()).min(s.duration);
            s.generation += 1;
        }
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let rearm = {
            let mut s = self.state.lock();
            if !s.loaded {
                return Err(BridgeError::OperationFailed("Nothing loaded".to_string()));
            }
            s.generation += 1;
            s.base = position.min(s.duration);
            if s.playing_since.is_some() {
                s.playing_since = Some(Instant::now());
                Some((s.generation, s.duration.saturating_sub(s.base)))
            } else {
                None
            }
        };
        if let Some((generation, remaining)) = rearm {
            self.arm_completion(generation, remaining);
        }
        Ok(())
    }

    async fn position(&self) -> Result<Duration> {
        Ok(self.state.lock().position())
    }

    async fn is_playing(&self) -> Result<bool> {
        Ok(self.state.lock().playing_since.is_some())
    }

    fn take_events(&self) -> Option<BackendEvents> {
        self.events.lock().take()
    }
}
