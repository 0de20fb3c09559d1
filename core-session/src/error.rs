use core_playback::PlaybackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// A command-triggered load or engine operation failed; the session is now
    /// in the `Error` state but remains responsive.
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// The command is not valid in the session's current state (e.g. seeking
    /// while idle). Recoverable by issuing `set_queue` again.
    #[error("Command not valid in the current playback state")]
    InvalidState,

    /// The controller task has shut down.
    #[error("Session controller is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SessionError>;
