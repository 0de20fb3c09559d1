//! # Playback Module
//!
//! The decoding-engine adapter for the playback session.
//!
//! ## Overview
//!
//! This crate handles:
//! - [`PlayerEngine`](engine::PlayerEngine) - wraps one host audio backend,
//!   enforces the one-source-at-a-time contract, and forwards completion and
//!   failure signals to the session controller
//! - [`SourceProbe`](probe::SourceProbe) - Symphonia-based source validation
//!   and duration probing (feature-gated)
//! - [`LocalFileBackend`](local::LocalFileBackend) - reference
//!   [`AudioBackend`](bridge_traits::playback::AudioBackend) that probes local
//!   sources and paces playback on the Tokio clock
//!
//! Queue policy and command serialization live in `core-session`; this crate
//! knows nothing about queues.

pub mod engine;
pub mod error;

#[cfg(feature = "decoder-symphonia")]
pub mod local;
#[cfg(feature = "decoder-symphonia")]
pub mod probe;

pub use engine::{EngineEvent, EngineEvents, PlayerEngine};
pub use error::{PlaybackError, Result};

#[cfg(feature = "decoder-symphonia")]
pub use local::LocalFileBackend;
#[cfg(feature = "decoder-symphonia")]
pub use probe::{AudioCodec, SourceProbe};
