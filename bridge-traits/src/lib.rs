//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the player core and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per host (desktop shell, mobile wrapper,
//! headless service).
//!
//! ## Traits
//!
//! - [`AudioBackend`](playback::AudioBackend) - the raw audio engine: decode,
//!   render, and report on exactly one source at a time
//! - [`NotificationHost`](notification::NotificationHost) - OS notification /
//!   media-session surface fed by the core's presenter
//! - [`SettingsStore`](storage::SettingsStore) - key-value preferences and
//!   override persistence
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for
//! consistent error handling. Platform implementations should convert their
//! native errors to `BridgeError` and include actionable context (file paths,
//! device names) in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared across async tasks. The core never calls back into a bridge from
//! more than one task at a time, but handles may be cloned freely.

pub mod error;
pub mod notification;
pub mod playback;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use notification::{MediaNotification, NotificationHost, TransportActions};
pub use playback::{AudioBackend, AudioSource, BackendEvent, BackendEvents};
pub use storage::SettingsStore;
