//! Persistent per-track overrides.
//!
//! Favorites, hidden tracks, metadata corrections, and custom artwork all
//! live as namespaced key-value entries in a [`SettingsStore`]. The session
//! core never sees this store; the UI applies overrides to `Track` values
//! before handing them to `set_queue`.

use crate::error::Result;
use crate::models::{Track, TrackId};
use bridge_traits::storage::SettingsStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const FAVORITE_PREFIX: &str = "favorite/";
const HIDDEN_PREFIX: &str = "hidden/";
const OVERRIDE_PREFIX: &str = "override/";
const ARTWORK_PREFIX: &str = "artwork/";

/// User-supplied metadata corrections for one track.
///
/// `None` fields fall through to the track's own metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOverride {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// When the override was last edited.
    pub updated_at: DateTime<Utc>,
}

impl TrackOverride {
    pub fn new() -> Self {
        Self {
            title: None,
            artist: None,
            album: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

impl Default for TrackOverride {
    fn default() -> Self {
        Self::new()
    }
}

/// Store for per-track user state layered over a key-value bridge.
#[derive(Clone)]
pub struct OverrideStore {
    settings: Arc<dyn SettingsStore>,
}

impl OverrideStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    pub async fn set_favorite(&self, id: TrackId, favorite: bool) -> Result<()> {
        let key = format!("{}{}", FAVORITE_PREFIX, id);
        if favorite {
            self.settings.set_bool(&key, true).await?;
        } else {
            self.settings.delete(&key).await?;
        }
        debug!(track = %id, favorite, "Updated favorite flag");
        Ok(())
    }

    pub async fn is_favorite(&self, id: TrackId) -> Result<bool> {
        let key = format!("{}{}", FAVORITE_PREFIX, id);
        Ok(self.settings.get_bool(&key).await?.unwrap_or(false))
    }

    pub async fn favorite_ids(&self) -> Result<HashSet<TrackId>> {
        self.ids_under(FAVORITE_PREFIX).await
    }

    // ------------------------------------------------------------------
    // Hidden tracks
    // ------------------------------------------------------------------

    pub async fn set_hidden(&self, id: TrackId, hidden: bool) -> Result<()> {
        let key = format!("{}{}", HIDDEN_PREFIX, id);
        if hidden {
            self.settings.set_bool(&key, true).await?;
        } else {
            self.settings.delete(&key).await?;
        }
        debug!(track = %id, hidden, "Updated hidden flag");
        Ok(())
    }

    pub async fn is_hidden(&self, id: TrackId) -> Result<bool> {
        let key = format!("{}{}", HIDDEN_PREFIX, id);
        Ok(self.settings.get_bool(&key).await?.unwrap_or(false))
    }

    pub async fn hidden_ids(&self) -> Result<HashSet<TrackId>> {
        self.ids_under(HIDDEN_PREFIX).await
    }

    // ------------------------------------------------------------------
    // Metadata overrides
    // ------------------------------------------------------------------

    pub async fn set_override(&self, id: TrackId, value: TrackOverride) -> Result<()> {
        let key = format!("{}{}", OVERRIDE_PREFIX, id);
        let json = serde_json::to_string(&value)?;
        self.settings.set_string(&key, &json).await?;
        Ok(())
    }

    pub async fn override_for(&self, id: TrackId) -> Result<Option<TrackOverride>> {
        let key = format!("{}{}", OVERRIDE_PREFIX, id);
        match self.settings.get_string(&key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn clear_override(&self, id: TrackId) -> Result<()> {
        let key = format!("{}{}", OVERRIDE_PREFIX, id);
        self.settings.delete(&key).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Custom artwork
    // ------------------------------------------------------------------

    pub async fn set_artwork(&self, id: TrackId, path: PathBuf) -> Result<()> {
        let key = format!("{}{}", ARTWORK_PREFIX, id);
        self.settings
            .set_string(&key, &path.to_string_lossy())
            .await?;
        Ok(())
    }

    pub async fn artwork_for(&self, id: TrackId) -> Result<Option<PathBuf>> {
        let key = format!("{}{}", ARTWORK_PREFIX, id);
        Ok(self.settings.get_string(&key).await?.map(PathBuf::from))
    }

    pub async fn clear_artwork(&self, id: TrackId) -> Result<()> {
        let key = format!("{}{}", ARTWORK_PREFIX, id);
        self.settings.delete(&key).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------

    /// Produce a copy of `track` with any stored metadata override applied.
    pub async fn apply(&self, track: Track) -> Result<Track> {
        let Some(ovr) = self.override_for(track.id).await? else {
            return Ok(track);
        };

        let mut track = track;
        if let Some(title) = ovr.title {
            track.title = title;
        }
        if let Some(artist) = ovr.artist {
            track.artist = artist;
        }
        if let Some(album) = ovr.album {
            track.album = Some(album);
        }
        Ok(track)
    }

    async fn ids_under(&self, prefix: &str) -> Result<HashSet<TrackId>> {
        let keys = self.settings.list_keys(Some(prefix)).await?;
        let ids = keys
            .iter()
            .filter_map(|key| key.strip_prefix(prefix))
            .filter_map(|raw| TrackId::from_string(raw).ok())
            .collect();
        Ok(ids)
    }
}
