//! End-to-end tests for the session controller over a scripted backend.
//!
//! The scripted backend loads instantly, tracks play/pause/seek state, and
//! lets the test fire completion and decode-failure signals on demand, the
//! same signals a real engine would raise from its own threads.

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::notification::{MediaNotification, NotificationHost};
use bridge_traits::playback::{AudioBackend, AudioSource, BackendEvent, BackendEvents};
use core_library::Track;
use core_playback::PlayerEngine;
use core_session::{
    PlaybackState, Queue, SessionController, SessionError, SessionHandle, SessionSnapshot,
};
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TRACK_LENGTH: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedInner {
    loaded: Option<String>,
    playing: bool,
    position: Duration,
    loads: Vec<String>,
}

struct ScriptedBackend {
    inner: Arc<Mutex<ScriptedInner>>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    events: Mutex<Option<BackendEvents>>,
}

/// Test-side controls for the backend: fire the async signals a real decoder
/// would produce, and inspect the load history.
#[derive(Clone)]
struct ScriptedRemote {
    inner: Arc<Mutex<ScriptedInner>>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
}

impl ScriptedBackend {
    fn new() -> (Self, ScriptedRemote) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let inner = Arc::new(Mutex::new(ScriptedInner::default()));
        let remote = ScriptedRemote {
            inner: Arc::clone(&inner),
            event_tx: event_tx.clone(),
        };
        (
            Self {
                inner,
                event_tx,
                events: Mutex::new(Some(events)),
            },
            remote,
        )
    }
}

impl ScriptedRemote {
    /// The loaded source reaches its natural end.
    fn complete_current(&self) {
        {
            let mut inner = self.inner.lock();
            inner.playing = false;
            inner.position = TRACK_LENGTH;
        }
        self.event_tx.send(BackendEvent::Completed).unwrap();
    }

    /// The decoder dies mid-playback.
    fn fail_decoding(&self, message: &str) {
        self.inner.lock().playing = false;
        self.event_tx
            .send(BackendEvent::Failed {
                message: message.to_string(),
            })
            .unwrap();
    }

    fn loads(&self) -> Vec<String> {
        self.inner.lock().loads.clone()
    }
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn load(&self, source: AudioSource) -> BridgeResult<Duration> {
        let described = source.describe();
        let mut inner = self.inner.lock();
        inner.loads.push(described.clone());
        if described.contains("unplayable") {
            inner.loaded = None;
            return Err(BridgeError::OperationFailed(format!(
                "cannot decode {}",
                described
            )));
        }
        inner.loaded = Some(described);
        inner.playing = false;
        inner.position = Duration::ZERO;
        Ok(TRACK_LENGTH)
    }

    async fn play(&self) -> BridgeResult<()> {
        let mut inner = self.inner.lock();
        if inner.loaded.is_none() {
            return Err(BridgeError::OperationFailed("nothing loaded".to_string()));
        }
        inner.playing = true;
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.inner.lock().playing = false;
        Ok(())
    }

    async fn seek(&self, position: Duration) -> BridgeResult<()> {
        self.inner.lock().position = position;
        Ok(())
    }

    async fn position(&self) -> BridgeResult<Duration> {
        Ok(self.inner.lock().position)
    }

    async fn is_playing(&self) -> BridgeResult<bool> {
        Ok(self.inner.lock().playing)
    }

    fn take_events(&self) -> Option<BackendEvents> {
        self.events.lock().take()
    }
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

/// Records every publish (`Some(card)`) and withdraw (`None`).
#[derive(Default)]
struct RecordingNotifier {
    cards: Mutex<Vec<Option<MediaNotification>>>,
}

impl RecordingNotifier {
    fn last(&self) -> Option<Option<MediaNotification>> {
        self.cards.lock().last().cloned()
    }
}

#[async_trait::async_trait]
impl NotificationHost for RecordingNotifier {
    async fn publish(&self, notification: MediaNotification) -> BridgeResult<()> {
        self.cards.lock().push(Some(notification));
        Ok(())
    }

    async fn withdraw(&self) -> BridgeResult<()> {
        self.cards.lock().push(None);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn track(name: &str) -> Track {
    Track::from_file(name, "Artist", format!("/music/{}.flac", name))
}

fn unplayable(name: &str) -> Track {
    Track::from_file(name, "Artist", format!("/music/unplayable-{}.flac", name))
}

fn start_session() -> (SessionHandle, ScriptedRemote, Arc<RecordingNotifier>) {
    let (backend, remote) = ScriptedBackend::new();
    let engine = PlayerEngine::new(Box::new(backend));
    let queue = Queue::with_rng(SmallRng::seed_from_u64(11));
    let notifier = Arc::new(RecordingNotifier::default());
    let handle = SessionController::spawn(engine, queue, notifier.clone());
    (handle, remote, notifier)
}

/// Poll snapshots (woken by the state channel) until `predicate` holds.
async fn wait_until(
    handle: &SessionHandle,
    mut predicate: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    tokio::time::timeout(Duration::from_secs(5), async {
        let mut changes = handle.subscribe();
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if predicate(&snapshot) {
                return snapshot;
            }
            let _ = changes.recv().await;
        }
    })
    .await
    .expect("session never reached the expected state")
}

fn title(snapshot: &SessionSnapshot) -> &str {
    snapshot.track.as_ref().map(|t| t.title.as_str()).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_queue_loads_and_plays_the_start_track() {
    let (session, remote, _) = start_session();

    session
        .set_queue(vec![track("A"), track("B"), track("C")], 1)
        .await
        .unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(title(&snapshot), "B");
    assert_eq!(snapshot.duration, TRACK_LENGTH);
    assert_eq!(remote.loads(), vec!["/music/B.flac"]);
}

#[tokio::test]
async fn commands_on_an_empty_queue_are_silent_noops() {
    let (session, remote, _) = start_session();

    session.set_queue(Vec::new(), 0).await.unwrap();
    session.play_pause().await.unwrap();
    session.next().await.unwrap();
    session.previous().await.unwrap();
    session.jump_to(3).await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(snapshot.track.is_none());
    assert!(remote.loads().is_empty());
}

#[tokio::test]
async fn play_pause_toggles_between_states() {
    let (session, _, _) = start_session();
    session.set_queue(vec![track("A")], 0).await.unwrap();

    session.play_pause().await.unwrap();
    assert_eq!(
        session.snapshot().await.unwrap().state,
        PlaybackState::Paused
    );

    session.play_pause().await.unwrap();
    assert_eq!(
        session.snapshot().await.unwrap().state,
        PlaybackState::Playing
    );
}

#[tokio::test]
async fn manual_navigation_preserves_pause_intent() {
    let (session, _, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 0)
        .await
        .unwrap();

    session.play_pause().await.unwrap(); // now paused
    session.next().await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(title(&snapshot), "B");
    assert_eq!(snapshot.state, PlaybackState::Paused);

    session.play_pause().await.unwrap();
    session.previous().await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(title(&snapshot), "A");
    assert_eq!(snapshot.state, PlaybackState::Playing);
}

#[tokio::test]
async fn manual_next_wraps_even_with_repeat_off() {
    let (session, _, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 1)
        .await
        .unwrap();

    session.next().await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(title(&snapshot), "A");
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(snapshot.repeat, core_session::RepeatMode::Off);
}

#[tokio::test]
async fn completions_advance_in_order_and_stop_at_the_end() {
    let (session, remote, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B"), track("C")], 0)
        .await
        .unwrap();

    remote.complete_current();
    let snapshot =
        wait_until(&session, |s| title(s) == "B" && s.state == PlaybackState::Playing).await;
    assert_eq!(snapshot.duration, TRACK_LENGTH);

    remote.complete_current();
    wait_until(&session, |s| title(s) == "C" && s.state == PlaybackState::Playing).await;

    // End of queue with repeat off: stop holding C, no wrap to A.
    remote.complete_current();
    let snapshot = wait_until(&session, |s| s.state == PlaybackState::Paused).await;
    assert_eq!(title(&snapshot), "C");
    assert_eq!(
        remote.loads(),
        vec!["/music/A.flac", "/music/B.flac", "/music/C.flac"]
    );
}

#[tokio::test]
async fn repeat_all_wraps_on_completion() {
    let (session, remote, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 1)
        .await
        .unwrap();
    session.cycle_repeat().await.unwrap(); // Off -> All

    remote.complete_current();
    wait_until(&session, |s| title(s) == "A" && s.state == PlaybackState::Playing).await;
}

#[tokio::test]
async fn repeat_one_replays_the_same_track() {
    let (session, remote, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 0)
        .await
        .unwrap();
    session.cycle_repeat().await.unwrap(); // Off -> All
    session.cycle_repeat().await.unwrap(); // All -> One

    remote.complete_current();
    let snapshot = wait_until(&session, |s| {
        s.state == PlaybackState::Playing && s.position == Duration::ZERO
    })
    .await;
    assert_eq!(title(&snapshot), "A");
    assert_eq!(remote.loads(), vec!["/music/A.flac", "/music/A.flac"]);
}

#[tokio::test]
async fn decode_failure_enters_error_without_advancing() {
    let (session, remote, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 0)
        .await
        .unwrap();

    remote.fail_decoding("bitstream desync");
    let snapshot = wait_until(&session, |s| s.state == PlaybackState::Error).await;

    // The failed track stays current; nothing else was loaded.
    assert_eq!(title(&snapshot), "A");
    assert_eq!(remote.loads(), vec!["/music/A.flac"]);

    // Manual navigation retries and resumes playback.
    session.next().await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(title(&snapshot), "B");
    assert_eq!(snapshot.state, PlaybackState::Playing);
}

#[tokio::test]
async fn failed_load_surfaces_to_the_caller_and_recovers() {
    let (session, _, _) = start_session();

    let err = session
        .set_queue(vec![unplayable("X")], 0)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Playback(_)));

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Error);
    assert_eq!(title(&snapshot), "X");

    // The controller stays responsive: a fresh queue returns to Playing.
    session.set_queue(vec![track("A")], 0).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(title(&snapshot), "A");
}

#[tokio::test]
async fn seek_reports_back_through_the_snapshot() {
    let (session, _, _) = start_session();
    session.set_queue(vec![track("A")], 0).await.unwrap();

    session.seek_to(Duration::from_millis(5000)).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.position, Duration::from_millis(5000));

    // Clamped into the track.
    session.seek_to(Duration::from_secs(600)).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.position, TRACK_LENGTH);
}

#[tokio::test]
async fn seek_outside_a_playable_state_is_invalid() {
    let (session, remote, _) = start_session();

    let err = session.seek_to(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidState));

    session.set_queue(vec![track("A")], 0).await.unwrap();
    remote.fail_decoding("boom");
    wait_until(&session, |s| s.state == PlaybackState::Error).await;

    let err = session.seek_to(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidState));
}

#[tokio::test]
async fn jump_to_targets_an_explicit_index() {
    let (session, remote, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B"), track("C")], 0)
        .await
        .unwrap();

    session.jump_to(2).await.unwrap();
    assert_eq!(title(&session.snapshot().await.unwrap()), "C");

    // Out of range: silent no-op, current unchanged.
    session.jump_to(17).await.unwrap();
    assert_eq!(title(&session.snapshot().await.unwrap()), "C");
    assert_eq!(remote.loads(), vec!["/music/A.flac", "/music/C.flac"]);
}

#[tokio::test]
async fn shuffle_and_repeat_publish_without_touching_state() {
    let (session, _, _) = start_session();
    session.set_queue(vec![track("A")], 0).await.unwrap();

    let mut changes = session.subscribe();
    session.toggle_shuffle().await.unwrap();
    changes.recv().await.unwrap();

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.shuffle);
    assert_eq!(snapshot.state, PlaybackState::Playing);

    session.cycle_repeat().await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.repeat, core_session::RepeatMode::All);
    assert_eq!(snapshot.state, PlaybackState::Playing);
}

#[tokio::test]
async fn notification_card_follows_the_session() {
    let (session, _, notifier) = start_session();

    session.set_queue(vec![track("A")], 0).await.unwrap();
    let card = notifier.last().unwrap().expect("card published");
    assert_eq!(card.title, "A");
    assert!(card.is_playing);

    session.play_pause().await.unwrap();
    let card = notifier.last().unwrap().expect("card refreshed");
    assert!(!card.is_playing);

    // Queue emptied: the notification is withdrawn.
    session.set_queue(Vec::new(), 0).await.unwrap();
    assert_eq!(notifier.last().unwrap(), None);
}

#[tokio::test]
async fn late_subscriber_can_catch_up_from_the_snapshot() {
    let (session, _, _) = start_session();
    session
        .set_queue(vec![track("A"), track("B")], 1)
        .await
        .unwrap();

    // Subscribing after the fact: the channel owes us nothing, but the
    // snapshot is complete on its own.
    let _changes = session.subscribe();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(title(&snapshot), "B");
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(snapshot.duration, TRACK_LENGTH);
}
