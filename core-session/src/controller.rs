//! # Session Controller
//!
//! The single state machine owning playback. One controller exists per
//! process; it is spawned by whatever hosts the foreground playback
//! capability and addressed through cloneable [`SessionHandle`]s, never
//! through global state.
//!
//! ## Serialization model
//!
//! The controller is a single-writer actor. Public commands and engine
//! signals (completion, decode failure) all land in one mailbox and are
//! applied strictly in arrival order, so there is no interleaving on the
//! queue pointer or the playback state. Engine signals originate on
//! backend-owned tasks; a forwarder marshals them into the mailbox rather
//! than letting the callback context touch shared state.
//!
//! Every processed message ends with a publish: a payload-free
//! [`StateChanged`] on the broadcast topic plus a fresh notification card
//! pushed to (or withdrawn from) the host.

use crate::error::{Result, SessionError};
use crate::presenter;
use crate::queue::{Direction, Queue, RepeatMode};
use crate::snapshot::{PlaybackState, SessionSnapshot};
use bridge_traits::notification::NotificationHost;
use core_library::Track;
use core_playback::{EngineEvent, PlayerEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Payload-free marker on the state channel: "something changed, re-fetch the
/// snapshot". Delivery is at-least-once; a lagged subscriber simply re-queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged;

enum Command {
    SetQueue {
        tracks: Vec<Track>,
        start_index: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    PlayPause {
        reply: oneshot::Sender<Result<()>>,
    },
    Next {
        reply: oneshot::Sender<Result<()>>,
    },
    Previous {
        reply: oneshot::Sender<Result<()>>,
    },
    JumpTo {
        index: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    SeekTo {
        position: Duration,
        reply: oneshot::Sender<Result<()>>,
    },
    ToggleShuffle {
        reply: oneshot::Sender<Result<()>>,
    },
    CycleRepeat {
        reply: oneshot::Sender<Result<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

enum Message {
    Command(Command),
    Engine(EngineEvent),
}

/// Cloneable command surface over the controller actor.
///
/// All methods funnel through the controller mailbox, so callers may invoke
/// them from any task without further coordination. The notification host
/// holds one of these to route its action buttons.
#[derive(Clone)]
pub struct SessionHandle {
    mailbox: mpsc::Sender<Message>,
    changes: broadcast::Sender<StateChanged>,
}

impl SessionHandle {
    /// Replace the queue and, when non-empty, load and play the track at
    /// `start_index` (clamped into range).
    pub async fn set_queue(&self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.request(|reply| Command::SetQueue {
            tracks,
            start_index,
            reply,
        })
        .await
    }

    /// Toggle between playing and paused. Silent no-op on an empty queue.
    pub async fn play_pause(&self) -> Result<()> {
        self.request(|reply| Command::PlayPause { reply }).await
    }

    /// Manual advance. Always moves (ignores repeat mode) and preserves the
    /// prior play/pause intent.
    pub async fn next(&self) -> Result<()> {
        self.request(|reply| Command::Next { reply }).await
    }

    /// Manual advance backwards; same contract as [`next`](Self::next).
    pub async fn previous(&self) -> Result<()> {
        self.request(|reply| Command::Previous { reply }).await
    }

    /// Jump to an explicit queue index ("play this item from a list").
    /// Out-of-range indexes are silent no-ops.
    pub async fn jump_to(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::JumpTo { index, reply }).await
    }

    /// Seek within the current track. Fails with
    /// [`SessionError::InvalidState`] while idle or errored.
    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        self.request(|reply| Command::SeekTo { position, reply })
            .await
    }

    pub async fn toggle_shuffle(&self) -> Result<()> {
        self.request(|reply| Command::ToggleShuffle { reply }).await
    }

    pub async fn cycle_repeat(&self) -> Result<()> {
        self.request(|reply| Command::CycleRepeat { reply }).await
    }

    /// Fetch a complete snapshot of the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.mailbox
            .send(Message::Command(Command::Snapshot { reply }))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Subscribe to the state channel. Pair with an immediate
    /// [`snapshot`](Self::snapshot) call to avoid an information gap.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.changes.subscribe()
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<()>>) -> Command,
    ) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.mailbox
            .send(Message::Command(build(reply)))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }
}

/// Spawns and owns the session actor.
pub struct SessionController;

impl SessionController {
    /// Spawn the controller task over an engine, a queue, and the host
    /// notification surface. Returns the handle used for every interaction;
    /// the task ends when the last handle is dropped.
    pub fn spawn(
        mut engine: PlayerEngine,
        queue: Queue,
        notifier: Arc<dyn NotificationHost>,
    ) -> SessionHandle {
        let (mailbox_tx, mailbox_rx) = mpsc::channel(64);
        let (changes, _) = broadcast::channel(32);

        // Marshal engine signals into the mailbox so they serialize with
        // commands instead of mutating state from the backend's context.
        if let Some(mut events) = engine.take_events() {
            let signals = mailbox_tx.clone();
            tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    if signals.send(Message::Engine(event)).await.is_err() {
                        break;
                    }
                }
            });
        } else {
            warn!("Engine events already taken; completion signals will be lost");
        }

        let worker = Worker {
            engine,
            queue,
            notifier,
            state: PlaybackState::Idle,
            play_intent: false,
            changes: changes.clone(),
        };
        tokio::spawn(worker.run(mailbox_rx));

        SessionHandle {
            mailbox: mailbox_tx,
            changes,
        }
    }
}

struct Worker {
    engine: PlayerEngine,
    queue: Queue,
    notifier: Arc<dyn NotificationHost>,
    state: PlaybackState,
    /// Whether playback should resume after the next successful load. Set on
    /// play/resume/auto-advance, cleared on pause; manual navigation and
    /// retry-from-error both honor it.
    play_intent: bool,
    changes: broadcast::Sender<StateChanged>,
}

impl Worker {
    async fn run(mut self, mut mailbox: mpsc::Receiver<Message>) {
        info!("Session controller started");
        while let Some(message) = mailbox.recv().await {
            match message {
                Message::Command(command) => self.handle_command(command).await,
                Message::Engine(event) => {
                    self.handle_engine_event(event).await;
                    self.publish().await;
                }
            }
        }
        info!("Session controller stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetQueue {
                tracks,
                start_index,
                reply,
            } => {
                let result = self.set_queue(tracks, start_index).await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::PlayPause { reply } => {
                let result = self.play_pause().await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::Next { reply } => {
                let result = self.navigate(Direction::Next).await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::Previous { reply } => {
                let result = self.navigate(Direction::Previous).await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::JumpTo { index, reply } => {
                let result = self.jump_to(index).await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::SeekTo { position, reply } => {
                let result = self.seek_to(position).await;
                self.publish().await;
                let _ = reply.send(result);
            }
            Command::ToggleShuffle { reply } => {
                self.queue.toggle_shuffle();
                self.publish().await;
                let _ = reply.send(Ok(()));
            }
            Command::CycleRepeat { reply } => {
                self.queue.cycle_repeat();
                self.publish().await;
                let _ = reply.send(Ok(()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot().await);
            }
        }
    }

    async fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        info!(count = tracks.len(), start_index, "Replacing queue");
        self.queue.set_tracks(tracks, start_index);

        if self.queue.is_empty() {
            self.state = PlaybackState::Idle;
            self.play_intent = false;
            return Ok(());
        }

        self.play_intent = true;
        self.load_current().await
    }

    async fn play_pause(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        match self.state {
            PlaybackState::Playing => {
                self.engine.pause().await?;
                self.state = PlaybackState::Paused;
                self.play_intent = false;
                Ok(())
            }
            PlaybackState::Paused => {
                self.engine.play().await?;
                self.state = PlaybackState::Playing;
                self.play_intent = true;
                Ok(())
            }
            // Queue was set without a load ever happening; start from the
            // current track.
            PlaybackState::Idle => {
                self.play_intent = true;
                self.load_current().await
            }
            PlaybackState::Loading => Ok(()),
            PlaybackState::Error => Err(SessionError::InvalidState),
        }
    }

    async fn navigate(&mut self, direction: Direction) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        // Manual navigation always moves, regardless of repeat mode.
        self.queue.advance(direction);
        self.load_current().await
    }

    async fn jump_to(&mut self, index: usize) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        if self.queue.jump_to(index).is_none() {
            debug!(index, "Ignoring jump to out-of-range index");
            return Ok(());
        }
        self.load_current().await
    }

    async fn seek_to(&mut self, position: Duration) -> Result<()> {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => {
                self.engine.seek(position).await?;
                Ok(())
            }
            _ => Err(SessionError::InvalidState),
        }
    }

    /// Load the queue's current track, then play or hold paused according to
    /// the play intent. On failure the session lands in `Error` with the
    /// failed track still current, and stays fully responsive.
    async fn load_current(&mut self) -> Result<()> {
        let Some(track) = self.queue.current().cloned() else {
            return Ok(());
        };

        self.state = PlaybackState::Loading;
        self.publish().await;

        debug!(track = %track.title, "Loading current track");
        match self.engine.load(track.source.clone()).await {
            Ok(_) => {
                if self.play_intent {
                    if let Err(e) = self.engine.play().await {
                        error!(track = %track.title, error = %e, "Engine refused to start");
                        self.state = PlaybackState::Error;
                        return Err(e.into());
                    }
                    self.state = PlaybackState::Playing;
                } else {
                    self.state = PlaybackState::Paused;
                }
                Ok(())
            }
            Err(e) => {
                warn!(track = %track.title, error = %e, "Failed to load track");
                self.state = PlaybackState::Error;
                Err(SessionError::Playback(e))
            }
        }
    }

    async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Completed => self.handle_completion().await,
            EngineEvent::Failed(e) => {
                error!(error = %e, "Decoder reported failure");
                // Keep the current track visible; no auto-retry, no advance.
                self.state = PlaybackState::Error;
            }
        }
    }

    async fn handle_completion(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        match self.queue.repeat() {
            RepeatMode::One => {
                debug!("Track completed; repeating it");
                self.play_intent = true;
                // Auto-advance failures land in `Error` inside load_current;
                // there is no caller to hand the error to.
                let _ = self.load_current().await;
            }
            RepeatMode::All => {
                debug!("Track completed; advancing with wraparound");
                self.queue.advance(Direction::Next);
                self.play_intent = true;
                let _ = self.load_current().await;
            }
            RepeatMode::Off => {
                if self.queue.is_on_last() {
                    info!("Reached end of queue; holding last track paused");
                    self.state = PlaybackState::Paused;
                    self.play_intent = false;
                } else {
                    debug!("Track completed; advancing");
                    self.queue.advance(Direction::Next);
                    self.play_intent = true;
                    let _ = self.load_current().await;
                }
            }
        }
    }

    async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            track: self.queue.current().cloned(),
            state: self.state,
            position: self.engine.position().await.unwrap_or_default(),
            duration: self.engine.duration(),
            shuffle: self.queue.shuffle(),
            repeat: self.queue.repeat(),
        }
    }

    /// Broadcast the change marker and refresh the host notification.
    async fn publish(&self) {
        let snapshot = self.snapshot().await;

        // No subscribers is fine; the notification host may be the only
        // observer.
        let _ = self.changes.send(StateChanged);

        match presenter::present(&snapshot) {
            Some(card) => {
                if let Err(e) = self.notifier.publish(card).await {
                    warn!(error = %e, "Failed to publish notification");
                }
            }
            None => {
                if let Err(e) = self.notifier.withdraw().await {
                    warn!(error = %e, "Failed to withdraw notification");
                }
            }
        }
    }
}
