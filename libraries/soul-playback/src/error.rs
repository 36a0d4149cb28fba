//! Error types for playback control

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Track is not part of the current track list
    #[error("Track not in play list: {0:?}")]
    TrackNotFound(PathBuf),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Invalid seek position
    #[error("Invalid seek position: {0:?}")]
    InvalidSeekPosition(Duration),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Engine resources were already released
    #[error("Playback resources released")]
    Released,
}

impl PlaybackError {
    /// Whether the error was caused by a bad argument rather than engine state
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PlaybackError::TrackNotFound(_)
                | PlaybackError::IndexOutOfBounds(_)
                | PlaybackError::InvalidSeekPosition(_)
        )
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
