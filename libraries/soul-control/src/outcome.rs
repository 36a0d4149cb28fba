//! Outcome codes returned across the process boundary

use serde::{Deserialize, Serialize};
use soul_playback::PlaybackError;

/// Result of a mutating command as seen by a remote caller
///
/// Errors never cross the boundary as faults: they become one of these
/// codes, and the caller decides whether to retry. Only [`Outcome::Success`]
/// means the playback state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Command executed
    Success,

    /// Requested track or index already current, nothing done
    AlreadyCurrent,

    /// Engine could not execute the command
    Unknown,

    /// Invalid track, index or position
    InvalidArgument,
}

impl Outcome {
    /// Wire code: positive on success, zero or negative otherwise
    pub fn code(self) -> i32 {
        match self {
            Outcome::Success => 1,
            Outcome::AlreadyCurrent => 0,
            Outcome::Unknown => -1,
            Outcome::InvalidArgument => -2,
        }
    }

    /// Whether the command changed playback state
    pub fn is_success(self) -> bool {
        self.code() > 0
    }
}

impl From<&PlaybackError> for Outcome {
    fn from(err: &PlaybackError) -> Self {
        if err.is_invalid_argument() {
            Outcome::InvalidArgument
        } else {
            Outcome::Unknown
        }
    }
}

impl From<soul_playback::Result<()>> for Outcome {
    fn from(result: soul_playback::Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(ref e) => Outcome::from(e),
        }
    }
}

impl From<Outcome> for i32 {
    fn from(outcome: Outcome) -> Self {
        outcome.code()
    }
}
