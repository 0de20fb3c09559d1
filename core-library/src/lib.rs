//! # Library Module
//!
//! Domain models and the simple store/query wrappers around them.
//!
//! ## Overview
//!
//! This crate handles:
//! - The immutable [`Track`](models::Track) value and its identifier newtypes
//! - The in-memory [`MemoryCatalog`](catalog::MemoryCatalog) with filter
//!   queries (all / artist / album / playlist / favorites)
//! - The [`OverrideStore`](overrides::OverrideStore): favorites, hidden
//!   tracks, metadata overrides, and custom artwork persisted as key-value
//!   entries
//!
//! Playback does not live here; the session core consumes `Track` values via
//! its `set_queue` command after the UI has applied any overrides.

pub mod catalog;
pub mod error;
pub mod models;
pub mod overrides;

pub use catalog::{MemoryCatalog, TrackCatalog, TrackFilter};
pub use error::{LibraryError, Result};
pub use models::{AlbumId, PlaylistId, Track, TrackId};
pub use overrides::{OverrideStore, TrackOverride};
