//! OS notification and media-session bridge.
//!
//! The session core projects its state into a [`MediaNotification`] and pushes
//! it here. The host renders it however its platform does (notification
//! center, media session, tray widget) and is expected to route the action
//! buttons back into the session's public command surface.

use crate::error::Result;

/// Which transport buttons the host should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportActions {
    pub previous: bool,
    pub play_pause: bool,
    pub next: bool,
}

impl TransportActions {
    /// All three transport buttons enabled.
    pub fn all() -> Self {
        Self {
            previous: true,
            play_pause: true,
            next: true,
        }
    }
}

/// Presentation model for the now-playing surface.
///
/// Always rebuilt from a full session snapshot; carries no hidden state, so a
/// host may re-render it from scratch on every publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaNotification {
    /// Track title.
    pub title: String,
    /// Artist line shown beneath the title.
    pub subtitle: String,
    /// Whether the play/pause button should show the "pause" glyph.
    pub is_playing: bool,
    /// Enabled transport actions.
    pub actions: TransportActions,
}

/// Trait for the host surface that displays the now-playing notification.
///
/// Hosts invoke the session's `play_pause`/`next`/`previous` commands when
/// their action buttons are pressed; this trait only covers the outbound
/// direction.
#[async_trait::async_trait]
pub trait NotificationHost: Send + Sync {
    /// Show or refresh the now-playing notification.
    async fn publish(&self, notification: MediaNotification) -> Result<()>;

    /// Remove the notification (queue became empty or playback tore down).
    async fn withdraw(&self) -> Result<()>;
}
