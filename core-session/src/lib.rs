//! # Playback Session Module
//!
//! The playback session controller: the state machine that owns "what track
//! is loaded, is it playing, what comes next" and serializes commands arriving
//! from multiple asynchronous sources (user taps, notification actions,
//! track-completion signals).
//!
//! ## Overview
//!
//! - [`Queue`](queue::Queue) - ordered tracks + current index + shuffle/repeat
//!   policy; pure data and selection, no I/O
//! - [`SessionController`](controller::SessionController) - single-writer
//!   actor owning one queue and one player engine; all mutation goes through
//!   its mailbox
//! - [`SessionHandle`](controller::SessionHandle) - cloneable command surface
//!   handed to UIs and the notification host
//! - [`SessionSnapshot`](snapshot::SessionSnapshot) - the complete, read-only
//!   projection observers consume; events never carry partial state
//! - [`present`](presenter::present) - pure snapshot → notification-card
//!   projection
//!
//! ## Observer protocol
//!
//! Subscribers receive payload-free [`StateChanged`](controller::StateChanged)
//! markers and re-query the controller for a full snapshot. A late subscriber
//! simply calls `snapshot()` right after `subscribe()`, so there is no
//! information gap.

pub mod controller;
pub mod error;
pub mod presenter;
pub mod queue;
pub mod snapshot;

pub use controller::{SessionController, SessionHandle, StateChanged};
pub use error::{Result, SessionError};
pub use presenter::present;
pub use queue::{Direction, Queue, RepeatMode};
pub use snapshot::{PlaybackState, SessionSnapshot};
