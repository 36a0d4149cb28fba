//! Playback engine contract
//!
//! Abstracts the playback state machine consumed by the control layer.
//! The reference implementation is [`crate::PlayController`]; platform
//! backends (decoder + audio output) implement the same trait.

use crate::error::Result;
use crate::types::{PlayMode, PlaybackStatus, Track};
use std::sync::Arc;
use std::time::Duration;

/// Receives status transitions from an engine
///
/// Engines must call this after releasing their own locks, so the observer
/// may read engine state from inside the callback.
pub trait StatusObserver: Send + Sync {
    /// Status of `track` (at `index` in the current list) changed to `status`
    fn status_changed(&self, track: &Track, index: usize, status: PlaybackStatus);
}

/// Observer that drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StatusObserver for NoopObserver {
    fn status_changed(&self, _track: &Track, _index: usize, _status: PlaybackStatus) {}
}

/// Playback state machine
///
/// All methods take `&self`: implementors synchronize their own state so
/// that read accessors stay safe while a command is running on another
/// thread. Serializing commands against each other is the caller's job.
pub trait PlaybackEngine: Send + Sync {
    /// Play `track` from the current list
    ///
    /// # Returns
    /// * `Err(TrackNotFound)` - track is not in the list
    fn play_track(&self, track: &Track) -> Result<()>;

    /// Play the track at `index` in the current list
    ///
    /// # Returns
    /// * `Err(IndexOutOfBounds)` - index is past the end of the list
    fn play_at(&self, index: usize) -> Result<()>;

    /// Move to the previous track according to the play mode
    ///
    /// Returns the new current track (`None` only when the list is empty).
    fn previous(&self) -> Option<Track>;

    /// Move to the next track according to the play mode
    ///
    /// Returns the new current track (`None` only when the list is empty).
    fn next(&self) -> Option<Track>;

    /// Pause playback
    fn pause(&self) -> Result<()>;

    /// Resume paused playback
    fn resume(&self) -> Result<()>;

    /// Current track, if any
    fn current_track(&self) -> Option<Track>;

    /// Index of the current track, if any
    fn current_index(&self) -> Option<usize>;

    /// Current playback status
    fn status(&self) -> PlaybackStatus;

    /// Copy of the current track list
    fn track_list(&self) -> Vec<Track>;

    /// Replace the track list
    ///
    /// The first track becomes current. Returns it (`None` for an empty list).
    fn set_track_list(&self, tracks: Vec<Track>) -> Option<Track>;

    /// Change play mode
    fn set_play_mode(&self, mode: PlayMode);

    /// Current play mode
    fn play_mode(&self) -> PlayMode;

    /// Playback position in the current track
    fn progress(&self) -> Duration;

    /// Seek in the current track
    ///
    /// # Returns
    /// * `Err(InvalidSeekPosition)` - position is past the end of the track
    fn seek_to(&self, position: Duration) -> Result<()>;

    /// Current track reached its natural end
    ///
    /// Advances according to the play mode and returns the new current track.
    fn complete(&self) -> Option<Track>;

    /// Release playback resources
    ///
    /// No further calls are expected afterwards.
    fn release(&self);
}

impl<T: PlaybackEngine + ?Sized> PlaybackEngine for Arc<T> {
    fn play_track(&self, track: &Track) -> Result<()> {
        (**self).play_track(track)
    }

    fn play_at(&self, index: usize) -> Result<()> {
        (**self).play_at(index)
    }

    fn previous(&self) -> Option<Track> {
        (**self).previous()
    }

    fn next(&self) -> Option<Track> {
        (**self).next()
    }

    fn pause(&self) -> Result<()> {
        (**self).pause()
    }

    fn resume(&self) -> Result<()> {
        (**self).resume()
    }

    fn current_track(&self) -> Option<Track> {
        (**self).current_track()
    }

    fn current_index(&self) -> Option<usize> {
        (**self).current_index()
    }

    fn status(&self) -> PlaybackStatus {
        (**self).status()
    }

    fn track_list(&self) -> Vec<Track> {
        (**self).track_list()
    }

    fn set_track_list(&self, tracks: Vec<Track>) -> Option<Track> {
        (**self).set_track_list(tracks)
    }

    fn set_play_mode(&self, mode: PlayMode) {
        (**self).set_play_mode(mode);
    }

    fn play_mode(&self) -> PlayMode {
        (**self).play_mode()
    }

    fn progress(&self) -> Duration {
        (**self).progress()
    }

    fn seek_to(&self, position: Duration) -> Result<()> {
        (**self).seek_to(position)
    }

    fn complete(&self) -> Option<Track> {
        (**self).complete()
    }

    fn release(&self) {
        (**self).release();
    }
}
