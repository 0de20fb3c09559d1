//! Headless demo: queue up audio files from the command line and let the
//! clock-paced backend walk through them, logging every state change.
//!
//! ```sh
//! cargo run -p core-service --features desktop --example headless_player -- a.flac b.mp3
//! ```

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::notification::{MediaNotification, NotificationHost};
use core_library::Track;
use core_playback::LocalFileBackend;
use core_service::{CoreDependencies, CoreService};
use core_session::PlaybackState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Notification host that just logs the card.
struct LogNotifier;

#[async_trait::async_trait]
impl NotificationHost for LogNotifier {
    async fn publish(&self, notification: MediaNotification) -> BridgeResult<()> {
        info!(
            title = notification.title,
            subtitle = notification.subtitle,
            playing = notification.is_playing,
            "now-playing card"
        );
        Ok(())
    }

    async fn withdraw(&self) -> BridgeResult<()> {
        info!("now-playing card withdrawn");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: headless_player <audio files...>");
        return Ok(());
    }

    let tracks: Vec<Track> = paths
        .iter()
        .map(|path| {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Unknown".to_string());
            Track::from_file(title, "Unknown Artist", path.clone())
        })
        .collect();

    let settings = bridge_desktop::SqliteSettingsStore::in_memory().await?;
    let core = CoreService::new(
        CoreDependencies::new(Arc::new(settings), Arc::new(LogNotifier)),
        Box::new(LocalFileBackend::new()),
    );

    let session = core.session();
    let mut changes = session.subscribe();

    session.set_queue(tracks, 0).await?;

    // Walk snapshots until the queue runs out (repeat is off by default, so
    // the session parks itself paused on the last track).
    while changes.recv().await.is_ok() {
        let snapshot = session.snapshot().await?;
        let title = snapshot
            .track
            .as_ref()
            .map(|t| t.title.as_str())
            .unwrap_or("<none>");
        info!(
            state = ?snapshot.state,
            track = title,
            position_ms = snapshot.position.as_millis() as u64,
            duration_ms = snapshot.duration.as_millis() as u64,
            "session state"
        );

        if matches!(snapshot.state, PlaybackState::Paused | PlaybackState::Error) {
            break;
        }
    }

    Ok(())
}
