//! Notification presenter: pure projection from a session snapshot to the
//! now-playing card the OS notification host renders.

use crate::snapshot::{PlaybackState, SessionSnapshot};
use bridge_traits::notification::{MediaNotification, TransportActions};

/// Build the now-playing card for a snapshot.
///
/// Returns `None` when there is no current track; the controller withdraws
/// the notification in that case. The card is always rebuildable from the
/// snapshot alone; there is no hidden state.
pub fn present(snapshot: &SessionSnapshot) -> Option<MediaNotification> {
    let track = snapshot.track.as_ref()?;

    Some(MediaNotification {
        title: track.title.clone(),
        subtitle: track.artist.clone(),
        is_playing: snapshot.state == PlaybackState::Playing,
        actions: TransportActions::all(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::Track;

    fn snapshot_with(state: PlaybackState) -> SessionSnapshot {
        SessionSnapshot {
            track: Some(Track::from_file("Holding Pattern", "The Idles", "/music/hp.flac")),
            state,
            ..SessionSnapshot::empty()
        }
    }

    #[test]
    fn no_track_means_no_card() {
        assert!(present(&SessionSnapshot::empty()).is_none());
    }

    #[test]
    fn card_reflects_track_and_playing_flag() {
        let card = present(&snapshot_with(PlaybackState::Playing)).unwrap();
        assert_eq!(card.title, "Holding Pattern");
        assert_eq!(card.subtitle, "The Idles");
        assert!(card.is_playing);
        assert!(card.actions.previous && card.actions.play_pause && card.actions.next);

        let paused = present(&snapshot_with(PlaybackState::Paused)).unwrap();
        assert!(!paused.is_playing);
    }

    #[test]
    fn error_state_still_presents_the_failed_track() {
        let card = present(&snapshot_with(PlaybackState::Error)).unwrap();
        assert_eq!(card.title, "Holding Pattern");
        assert!(!card.is_playing);
    }
}
