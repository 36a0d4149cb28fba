//! Reference playback engine
//!
//! In-memory state machine implementing [`PlaybackEngine`]: track list,
//! current index, play mode, status and a wall-clock position. It does not
//! decode audio; platform backends wrap a decoder around the same contract.

use crate::{
    engine::{NoopObserver, PlaybackEngine, StatusObserver},
    error::{PlaybackError, Result},
    history::History,
    navigation::{completion_index, next_index, previous_index},
    types::{PlayMode, PlaybackConfig, PlaybackStatus, Track},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Position clock for the current track
#[derive(Debug, Clone, Copy, Default)]
struct Clock {
    /// Position accumulated before the last start
    offset: Duration,

    /// Set while running
    started_at: Option<Instant>,
}

impl Clock {
    fn position(&self, limit: Duration) -> Duration {
        let elapsed = self.started_at.map_or(Duration::ZERO, |at| at.elapsed());
        (self.offset + elapsed).min(limit)
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self, limit: Duration) {
        self.offset = self.position(limit);
        self.started_at = None;
    }

    fn seek(&mut self, position: Duration) {
        self.offset = position;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = None;
    }
}

/// Status change to report once the state lock is released
type Notification = (Track, usize, PlaybackStatus);

struct State {
    tracks: Vec<Track>,
    current: Option<usize>,
    status: PlaybackStatus,
    mode: PlayMode,
    history: History,
    clock: Clock,
    rng: StdRng,
    released: bool,
}

impl State {
    fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|index| self.tracks.get(index))
    }

    fn current_duration(&self) -> Duration {
        self.current_track().map_or(Duration::ZERO, |track| track.duration)
    }

    /// Make `index` current and start it from the beginning
    fn start_at(&mut self, index: usize, record_history: bool) -> Notification {
        if record_history {
            if let Some(previous) = self.current_track().cloned() {
                self.history.push(previous);
            }
        }

        self.current = Some(index);
        self.status = PlaybackStatus::Started;
        self.clock.reset();
        self.clock.start();

        (self.tracks[index].clone(), index, PlaybackStatus::Started)
    }

    /// Pop history entries until one is still in the list
    fn pop_history_index(&mut self) -> Option<usize> {
        while let Some(track) = self.history.pop() {
            if let Some(index) = self.tracks.iter().position(|t| *t == track) {
                return Some(index);
            }
        }
        None
    }
}

/// In-memory playback state machine
///
/// Every method takes `&self`; fields live behind one short-lived
/// `RwLock`, so read accessors never wait for anything but another
/// accessor's copy. Status changes go to the observer after the lock is
/// dropped.
pub struct PlayController {
    state: RwLock<State>,
    observer: Arc<dyn StatusObserver>,
}

impl PlayController {
    /// Create an engine over `tracks` without a status observer
    pub fn new(tracks: Vec<Track>, config: PlaybackConfig) -> Self {
        Self::with_observer(tracks, config, Arc::new(NoopObserver))
    }

    /// Create an engine over `tracks` reporting status changes to `observer`
    ///
    /// Nothing is current until the first play command.
    pub fn with_observer(
        tracks: Vec<Track>,
        config: PlaybackConfig,
        observer: Arc<dyn StatusObserver>,
    ) -> Self {
        Self {
            state: RwLock::new(State {
                tracks,
                current: None,
                status: PlaybackStatus::Idle,
                mode: config.play_mode,
                history: History::new(config.history_size),
                clock: Clock::default(),
                rng: StdRng::from_entropy(),
                released: false,
            }),
            observer,
        }
    }

    /// Replace the random source (deterministic random mode in tests)
    pub fn with_seed(self, seed: u64) -> Self {
        self.write().rng = StdRng::seed_from_u64(seed);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notifications: Vec<Notification>) {
        for (track, index, status) in notifications {
            self.observer.status_changed(&track, index, status);
        }
    }

    fn play_index(&self, index: usize) -> Result<()> {
        let notification = {
            let mut state = self.write();
            if state.released {
                return Err(PlaybackError::Released);
            }
            if index >= state.tracks.len() {
                return Err(PlaybackError::IndexOutOfBounds(index));
            }
            state.start_at(index, true)
        };

        tracing::debug!("Playing {:?} at index {}", notification.0.path, index);
        self.notify(vec![notification]);
        Ok(())
    }
}

impl PlaybackEngine for PlayController {
    fn play_track(&self, track: &Track) -> Result<()> {
        let index = self
            .read()
            .tracks
            .iter()
            .position(|t| t == track)
            .ok_or_else(|| PlaybackError::TrackNotFound(track.path.clone()))?;
        self.play_index(index)
    }

    fn play_at(&self, index: usize) -> Result<()> {
        self.play_index(index)
    }

    fn previous(&self) -> Option<Track> {
        let notification = {
            let mut state = self.write();
            if state.released {
                return state.current_track().cloned();
            }

            let len = state.tracks.len();
            let current = state.current;
            let mode = state.mode;
            let index = match mode {
                PlayMode::Random => state
                    .pop_history_index()
                    .or_else(|| previous_index(current, len, mode, &mut state.rng)),
                _ => previous_index(current, len, mode, &mut state.rng),
            }?;
            state.start_at(index, false)
        };

        let track = notification.0.clone();
        self.notify(vec![notification]);
        Some(track)
    }

    fn next(&self) -> Option<Track> {
        let notification = {
            let mut state = self.write();
            if state.released {
                return state.current_track().cloned();
            }

            let len = state.tracks.len();
            let current = state.current;
            let mode = state.mode;
            let index = next_index(current, len, mode, &mut state.rng)?;
            state.start_at(index, true)
        };

        let track = notification.0.clone();
        self.notify(vec![notification]);
        Some(track)
    }

    fn pause(&self) -> Result<()> {
        let notification = {
            let mut state = self.write();
            if state.released {
                return Err(PlaybackError::Released);
            }
            let index = state.current.ok_or(PlaybackError::NoTrackLoaded)?;
            if state.status != PlaybackStatus::Started {
                return Err(PlaybackError::InvalidOperation(
                    "pause requires a playing track".to_string(),
                ));
            }

            let limit = state.current_duration();
            state.clock.stop(limit);
            state.status = PlaybackStatus::Paused;
            (state.tracks[index].clone(), index, PlaybackStatus::Paused)
        };

        self.notify(vec![notification]);
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        let notification = {
            let mut state = self.write();
            if state.released {
                return Err(PlaybackError::Released);
            }
            let index = state.current.ok_or(PlaybackError::NoTrackLoaded)?;
            match state.status {
                PlaybackStatus::Started => {
                    return Err(PlaybackError::InvalidOperation(
                        "already playing".to_string(),
                    ));
                }
                PlaybackStatus::Paused => {}
                PlaybackStatus::Idle | PlaybackStatus::Completed => state.clock.reset(),
            }

            state.clock.start();
            state.status = PlaybackStatus::Started;
            (state.tracks[index].clone(), index, PlaybackStatus::Started)
        };

        self.notify(vec![notification]);
        Ok(())
    }

    fn current_track(&self) -> Option<Track> {
        self.read().current_track().cloned()
    }

    fn current_index(&self) -> Option<usize> {
        self.read().current
    }

    fn status(&self) -> PlaybackStatus {
        self.read().status
    }

    fn track_list(&self) -> Vec<Track> {
        self.read().tracks.clone()
    }

    fn set_track_list(&self, tracks: Vec<Track>) -> Option<Track> {
        let (first, notification) = {
            let mut state = self.write();
            if state.released {
                return state.current_track().cloned();
            }

            let was_playing = state.status == PlaybackStatus::Started;
            state.tracks = tracks;
            state.history.clear();
            state.clock.reset();
            state.current = None;
            state.status = PlaybackStatus::Idle;

            if state.tracks.is_empty() {
                (None, None)
            } else if was_playing {
                let notification = state.start_at(0, false);
                (Some(notification.0.clone()), Some(notification))
            } else {
                state.current = Some(0);
                (Some(state.tracks[0].clone()), None)
            }
        };

        tracing::debug!("Track list replaced, first track {:?}", first.as_ref().map(|t| &t.path));
        self.notify(notification.into_iter().collect());
        first
    }

    fn set_play_mode(&self, mode: PlayMode) {
        let mut state = self.write();
        if !state.released {
            state.mode = mode;
        }
    }

    fn play_mode(&self) -> PlayMode {
        self.read().mode
    }

    fn progress(&self) -> Duration {
        let state = self.read();
        state.clock.position(state.current_duration())
    }

    fn seek_to(&self, position: Duration) -> Result<()> {
        let mut state = self.write();
        if state.released {
            return Err(PlaybackError::Released);
        }
        let track = state.current_track().ok_or(PlaybackError::NoTrackLoaded)?;
        if position > track.duration {
            return Err(PlaybackError::InvalidSeekPosition(position));
        }

        state.clock.seek(position);
        Ok(())
    }

    fn complete(&self) -> Option<Track> {
        let (current, notifications) = {
            let mut state = self.write();
            if state.released {
                return state.current_track().cloned();
            }
            let index = state.current?;

            let mut notifications = vec![(
                state.tracks[index].clone(),
                index,
                PlaybackStatus::Completed,
            )];
            let limit = state.current_duration();
            state.clock.stop(limit);
            state.status = PlaybackStatus::Completed;

            let len = state.tracks.len();
            let mode = state.mode;
            if let Some(next) = completion_index(Some(index), len, mode, &mut state.rng) {
                notifications.push(state.start_at(next, true));
            }

            (state.current_track().cloned(), notifications)
        };

        self.notify(notifications);
        current
    }

    fn release(&self) {
        let mut state = self.write();
        if state.released {
            return;
        }
        let limit = state.current_duration();
        state.clock.stop(limit);
        state.status = PlaybackStatus::Idle;
        state.released = true;
        tracing::info!("Playback resources released");
    }
}
