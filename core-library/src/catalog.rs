//! Track catalog: in-memory store with filter queries.
//!
//! The host enumerates device media into [`Track`] records and feeds them in;
//! screens query by filter and hand the resulting list to the session's
//! `set_queue`. This is deliberately a plain store/query wrapper: ordering is
//! insertion order, and there is no indexing beyond linear scans.

use crate::error::Result;
use crate::models::{AlbumId, PlaylistId, Track, TrackId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Filter selecting a subset of the catalog.
#[derive(Debug, Clone)]
pub enum TrackFilter {
    /// Every non-hidden track.
    All,
    /// Tracks whose artist string matches exactly.
    Artist(String),
    /// Tracks belonging to an album.
    Album(AlbumId),
    /// Tracks of a stored playlist, in playlist order.
    Playlist(PlaylistId),
    /// Tracks whose id is in the given favorite set.
    Favorites(HashSet<TrackId>),
}

/// Read surface of a track catalog.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Return the tracks selected by `filter`.
    async fn query(&self, filter: &TrackFilter) -> Result<Vec<Track>>;

    /// Look up a single track by id.
    async fn get(&self, id: &TrackId) -> Result<Option<Track>>;
}

#[derive(Default)]
struct CatalogState {
    tracks: Vec<Track>,
    playlists: HashMap<PlaylistId, Vec<TrackId>>,
    hidden: HashSet<TrackId>,
}

/// In-memory catalog implementation.
///
/// Interior mutability so screens can share one instance behind an `Arc`;
/// writers replace or append, readers filter.
#[derive(Default)]
pub struct MemoryCatalog {
    state: RwLock<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog contents.
    pub fn replace_all(&self, tracks: Vec<Track>) {
        debug!(count = tracks.len(), "Replacing catalog contents");
        let mut state = self.state.write();
        state.tracks = tracks;
    }

    /// Append a single track.
    pub fn insert(&self, track: Track) {
        self.state.write().tracks.push(track);
    }

    /// Store or replace a playlist's track-id sequence.
    pub fn set_playlist(&self, id: PlaylistId, track_ids: Vec<TrackId>) {
        self.state.write().playlists.insert(id, track_ids);
    }

    /// Mark tracks that `TrackFilter::All` should skip. The UI keeps this in
    /// sync with the override store's hidden set.
    pub fn set_hidden(&self, hidden: HashSet<TrackId>) {
        self.state.write().hidden = hidden;
    }

    pub fn len(&self) -> usize {
        self.state.read().tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().tracks.is_empty()
    }
}

#[async_trait]
impl TrackCatalog for MemoryCatalog {
    async fn query(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        let state = self.state.read();
        let selected = match filter {
            TrackFilter::All => state
                .tracks
                .iter()
                .filter(|t| !state.hidden.contains(&t.id))
                .cloned()
                .collect(),
            TrackFilter::Artist(artist) => state
                .tracks
                .iter()
                .filter(|t| &t.artist == artist)
                .cloned()
                .collect(),
            TrackFilter::Album(album_id) => state
                .tracks
                .iter()
                .filter(|t| t.album_id.as_ref() == Some(album_id))
                .cloned()
                .collect(),
            TrackFilter::Playlist(playlist_id) => {
                let by_id: HashMap<TrackId, &Track> =
                    state.tracks.iter().map(|t| (t.id, t)).collect();
                state
                    .playlists
                    .get(playlist_id)
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
                            .collect()
                    })
                    .unwrap_or_default()
            }
            TrackFilter::Favorites(ids) => state
                .tracks
                .iter()
                .filter(|t| ids.contains(&t.id))
                .cloned()
                .collect(),
        };
        Ok(selected)
    }

    async fn get(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(self.state.read().tracks.iter().find(|t| &t.id == id).cloned())
    }
}
