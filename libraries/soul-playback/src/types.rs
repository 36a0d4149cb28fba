//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

/// A playable item
///
/// Identity is the file path: two `Track` values with the same path are the
/// same track, whatever their metadata says. Equality and hashing use the
/// path only, so list lookups (`position`, `contains`) are identity lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// File path for audio decoding (identity key)
    pub path: PathBuf,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Track duration
    pub duration: Duration,
}

impl Track {
    /// Create a track with only a path and duration
    ///
    /// Title defaults to the file stem, artist to "Unknown Artist".
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            title,
            artist: "Unknown Artist".to_string(),
            album: None,
            duration,
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Playback status
///
/// Reported to the status observer on every transition. Only `Started` and
/// `Completed` are forwarded to remote listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing playing (initial state, or stopped after the last track)
    Idle,

    /// Currently playing
    Started,

    /// Paused mid-track
    Paused,

    /// Current track reached its end
    Completed,
}

impl PlaybackStatus {
    /// Wire code for this status
    pub fn code(self) -> i32 {
        match self {
            PlaybackStatus::Idle => 0,
            PlaybackStatus::Started => 1,
            PlaybackStatus::Paused => 2,
            PlaybackStatus::Completed => 3,
        }
    }
}

/// Play mode
///
/// Decides which track follows the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Play the list in order, stop after the last track
    Default,

    /// Loop current track on natural completion
    SingleLoop,

    /// Loop entire list
    ListLoop,

    /// Pick a random track (may pick the current one again)
    Random,
}

impl PlayMode {
    /// Lowest valid wire code
    pub const MIN_CODE: i32 = 0;

    /// Highest valid wire code
    pub const MAX_CODE: i32 = 3;

    /// Decode a wire code, `None` when out of range
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PlayMode::Default),
            1 => Some(PlayMode::SingleLoop),
            2 => Some(PlayMode::ListLoop),
            3 => Some(PlayMode::Random),
            _ => None,
        }
    }

    /// Wire code for this mode
    pub fn code(self) -> i32 {
        match self {
            PlayMode::Default => 0,
            PlayMode::SingleLoop => 1,
            PlayMode::ListLoop => 2,
            PlayMode::Random => 3,
        }
    }
}

/// Configuration for the reference playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum history size used by `previous()` in random mode (default: 50)
    pub history_size: usize,

    /// Initial play mode (default: Default)
    pub play_mode: PlayMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            play_mode: PlayMode::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 50);
        assert_eq!(config.play_mode, PlayMode::Default);
    }

    #[test]
    fn track_identity_is_the_path() {
        let a = Track::new("/music/a.mp3", Duration::from_secs(180));
        let mut renamed = a.clone();
        renamed.title = "Something Else".to_string();
        renamed.duration = Duration::from_secs(1);

        assert_eq!(a, renamed);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(renamed));
    }

    #[test]
    fn track_title_defaults_to_file_stem() {
        let track = Track::new("/music/Blue in Green.flac", Duration::from_secs(337));
        assert_eq!(track.title, "Blue in Green");
        assert_eq!(track.artist, "Unknown Artist");
    }

    #[test]
    fn status_codes() {
        let codes: Vec<_> = [
            PlaybackStatus::Idle,
            PlaybackStatus::Started,
            PlaybackStatus::Paused,
            PlaybackStatus::Completed,
        ]
        .iter()
        .map(|status| status.code())
        .collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn play_mode_codes() {
        for code in PlayMode::MIN_CODE..=PlayMode::MAX_CODE {
            let mode = PlayMode::from_code(code).unwrap();
            assert_eq!(mode.code(), code);
        }
        assert_eq!(PlayMode::from_code(-1), None);
        assert_eq!(PlayMode::from_code(PlayMode::MAX_CODE + 1), None);
    }
}
