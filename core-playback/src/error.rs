//! # Playback Error Types
//!
//! Error types for the decoding-engine adapter.

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Load Failures
    // ========================================================================
    /// Failed to open or read an audio source.
    #[error("Failed to open audio source: {0}")]
    SourceError(String),

    /// Audio format is not recognized or cannot be parsed.
    #[error("Unsupported or invalid audio format: {0}")]
    InvalidFormat(String),

    /// Codec is not supported by the probe/decoder.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Error occurred during audio decoding.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    // ========================================================================
    // Control Errors
    // ========================================================================
    /// Attempted operation when no track is loaded.
    #[error("No track loaded")]
    NoTrackLoaded,

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Failure reported by the host audio backend.
    #[error("Backend error: {0}")]
    Backend(#[from] BridgeError),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` for the load-failure family: the source itself could
    /// not be opened or decoded (as opposed to a control call made in the
    /// wrong state).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            PlaybackError::SourceError(_)
                | PlaybackError::InvalidFormat(_)
                | PlaybackError::UnsupportedCodec(_)
                | PlaybackError::DecodingError(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
