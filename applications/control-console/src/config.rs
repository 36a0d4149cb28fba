/// Console configuration
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use soul_playback::{PlayMode, PlaybackConfig, Track};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "soul-control.toml";

/// Assumed length of a track configured without a duration
pub const DEFAULT_TRACK_SECS: u64 = 180;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Initial play mode wire code
    #[serde(default)]
    pub play_mode: i32,

    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackEntry {
    pub path: PathBuf,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub duration_secs: Option<u64>,
}

impl TrackEntry {
    pub fn to_track(&self) -> Track {
        let duration = Duration::from_secs(self.duration_secs.unwrap_or(DEFAULT_TRACK_SECS));
        let mut track = Track::new(self.path.clone(), duration);
        if let Some(title) = &self.title {
            track.title.clone_from(title);
        }
        if let Some(artist) = &self.artist {
            track.artist.clone_from(artist);
        }
        track
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (SOUL_CONTROL_PLAYBACK__PLAY_MODE=2)
        settings = settings.add_source(
            config::Environment::with_prefix("SOUL_CONTROL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if PlayMode::from_code(self.playback.play_mode).is_none() {
            return Err(ConsoleError::Config(format!(
                "play_mode must be between {} and {}, got {}",
                PlayMode::MIN_CODE,
                PlayMode::MAX_CODE,
                self.playback.play_mode
            )));
        }

        if self.playback.history_size == 0 {
            return Err(ConsoleError::Config(
                "history_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Engine configuration (call [`validate`](Self::validate) first)
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            history_size: self.playback.history_size,
            play_mode: PlayMode::from_code(self.playback.play_mode).unwrap_or(PlayMode::Default),
        }
    }

    /// Configured library followed by `extra` paths
    pub fn tracks(&self, extra: &[PathBuf]) -> Vec<Track> {
        self.library
            .tracks
            .iter()
            .map(TrackEntry::to_track)
            .chain(
                extra
                    .iter()
                    .map(|path| Track::new(path.clone(), Duration::from_secs(DEFAULT_TRACK_SECS))),
            )
            .collect()
    }
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        play_mode: PlayMode::Default.code(),
        history_size: default_history_size(),
    }
}

fn default_history_size() -> usize {
    PlaybackConfig::default().history_size
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "soul_control=info,soul_playback=info".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            playback: default_playback(),
            library: LibrarySettings::default(),
            logging: default_logging(),
        }
    }
}
