//! Control facade
//!
//! The single entry point remote callers talk to. Every command that
//! mutates playback runs inside one session-wide critical section; reads go
//! straight to the engine and may observe a value a running command is
//! about to replace.
//!
//! A mutating command runs as:
//! 1. Take the session lock
//! 2. Record the current track
//! 3. Run the engine command
//! 4. If it succeeded and the current track identity changed, broadcast the
//!    new track to the track listeners
//! 5. Return the raw result
//!
//! Listener callbacks run before the command returns, still inside the
//! critical section. A listener living in the same process must therefore
//! not call a mutating command from inside its callback on the same thread.

use crate::dispatch::{broadcast_status, broadcast_track_changed, DeliveryReport};
use crate::listener::{
    ListenerId, StatusListener, StatusListenerHandle, TrackListener, TrackListenerHandle,
};
use crate::outcome::Outcome;
use crate::registry::ListenerRegistry;
use soul_playback::{
    PlayController, PlayMode, PlaybackConfig, PlaybackEngine, PlaybackStatus, StatusObserver,
    Track,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Bridges engine status changes to the status listeners
pub(crate) struct StatusNotifier {
    listeners: Arc<ListenerRegistry<dyn StatusListener>>,
}

impl StatusObserver for StatusNotifier {
    fn status_changed(&self, track: &Track, index: usize, status: PlaybackStatus) {
        let report = broadcast_status(&self.listeners, track, index, status);
        if report.total() > 0 {
            tracing::debug!(
                "Status {:?} of {:?} delivered to {}/{} listeners",
                status,
                track.path,
                report.delivered,
                report.total()
            );
        }
    }
}

/// Serialized playback control with listener broadcast
pub struct PlayControl<E: PlaybackEngine> {
    engine: E,

    /// Critical section shared by every mutating command
    session: Mutex<()>,

    track_listeners: Arc<ListenerRegistry<dyn TrackListener>>,
    status_listeners: Arc<ListenerRegistry<dyn StatusListener>>,
}

impl PlayControl<PlayController> {
    /// Create a service over `tracks` backed by the reference engine
    pub fn new(tracks: Vec<Track>, config: PlaybackConfig) -> Self {
        Self::with_engine(|observer| PlayController::with_observer(tracks, config, observer))
    }
}

impl<E: PlaybackEngine> PlayControl<E> {
    /// Create a service over the engine returned by `build`
    ///
    /// `build` receives the observer the engine must report status changes
    /// to; those reach the registered status listeners.
    pub fn with_engine<F>(build: F) -> Self
    where
        F: FnOnce(Arc<dyn StatusObserver>) -> E,
    {
        let status_listeners: Arc<ListenerRegistry<dyn StatusListener>> =
            Arc::new(ListenerRegistry::new());
        let notifier = StatusNotifier {
            listeners: Arc::clone(&status_listeners),
        };

        Self {
            engine: build(Arc::new(notifier)),
            session: Mutex::new(()),
            track_listeners: Arc::new(ListenerRegistry::new()),
            status_listeners,
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, ()> {
        // The lock guards no data, a panic inside a command leaves nothing to repair
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Index of `track` in the play list
    ///
    /// Prefers the engine's current index when it points at `track`, so a
    /// list holding the same track twice reports the entry actually playing.
    fn index_of(&self, track: &Track) -> Option<usize> {
        let list = self.engine.track_list();
        match self.engine.current_index() {
            Some(index) if list.get(index) == Some(track) => Some(index),
            _ => list.iter().position(|t| t == track),
        }
    }

    fn announce(&self, track: &Track, index: usize) -> DeliveryReport {
        broadcast_track_changed(&self.track_listeners, track, index)
    }

    /// Broadcast the current track if its identity differs from `before`
    fn announce_if_changed(&self, before: Option<&Track>, after: Option<&Track>) {
        let Some(track) = after else {
            return;
        };
        if before == Some(track) {
            return;
        }

        match self.index_of(track) {
            Some(index) => {
                self.announce(track, index);
            }
            None => tracing::warn!("Current track {:?} missing from play list", track.path),
        }
    }

    // ===== Serialized commands =====

    /// Play `track` from the current list
    ///
    /// Returns [`Outcome::AlreadyCurrent`] without touching the engine if
    /// `track` is already current.
    pub fn play(&self, track: &Track) -> Outcome {
        let _session = self.lock_session();
        let before = self.engine.current_track();
        if before.as_ref() == Some(track) {
            tracing::debug!("play {:?}: already current", track.path);
            return Outcome::AlreadyCurrent;
        }

        let outcome = Outcome::from(self.engine.play_track(track));
        tracing::debug!("play {:?} -> {:?}", track.path, outcome);
        if outcome.is_success() {
            self.announce_if_changed(before.as_ref(), self.engine.current_track().as_ref());
        }
        outcome
    }

    /// Play the track at `index`
    ///
    /// Returns [`Outcome::AlreadyCurrent`] without touching the engine if
    /// `index` is already current.
    pub fn play_at(&self, index: usize) -> Outcome {
        let _session = self.lock_session();
        if self.engine.current_index() == Some(index) {
            tracing::debug!("play_at {}: already current", index);
            return Outcome::AlreadyCurrent;
        }

        let before = self.engine.current_track();
        let outcome = Outcome::from(self.engine.play_at(index));
        tracing::debug!("play_at {} -> {:?}", index, outcome);
        if outcome.is_success() {
            self.announce_if_changed(before.as_ref(), self.engine.current_track().as_ref());
        }
        outcome
    }

    /// Skip to the previous track
    pub fn previous(&self) -> Option<Track> {
        let _session = self.lock_session();
        let before = self.engine.current_track();
        let track = self.engine.previous();
        tracing::debug!("previous -> {:?}", track.as_ref().map(|t| &t.path));
        self.announce_if_changed(before.as_ref(), track.as_ref());
        track
    }

    /// Skip to the next track
    ///
    /// In random mode the engine may pick the current track again; that is
    /// not a change and is not broadcast.
    pub fn next(&self) -> Option<Track> {
        let _session = self.lock_session();
        let before = self.engine.current_track();
        let track = self.engine.next();
        tracing::debug!("next -> {:?}", track.as_ref().map(|t| &t.path));
        self.announce_if_changed(before.as_ref(), track.as_ref());
        track
    }

    /// Pause playback
    pub fn pause(&self) -> Outcome {
        let _session = self.lock_session();
        let outcome = Outcome::from(self.engine.pause());
        tracing::debug!("pause -> {:?}", outcome);
        outcome
    }

    /// Resume playback
    pub fn resume(&self) -> Outcome {
        let _session = self.lock_session();
        let outcome = Outcome::from(self.engine.resume());
        tracing::debug!("resume -> {:?}", outcome);
        outcome
    }

    /// Replace the play list
    ///
    /// The first track of the new list is always broadcast, even when it is
    /// the track that was current before. An empty list broadcasts nothing.
    pub fn set_play_list(&self, tracks: Vec<Track>) -> Option<Track> {
        let _session = self.lock_session();
        let len = tracks.len();
        let first = self.engine.set_track_list(tracks);
        tracing::debug!("set_play_list: {} tracks", len);
        if let Some(track) = &first {
            self.announce(track, 0);
        }
        first
    }

    /// Change play mode from its wire code
    ///
    /// Codes outside the valid range are ignored.
    pub fn set_play_mode(&self, code: i32) {
        let _session = self.lock_session();
        match PlayMode::from_code(code) {
            Some(mode) => {
                self.engine.set_play_mode(mode);
                tracing::debug!("set_play_mode {:?}", mode);
            }
            None => tracing::debug!("Ignoring invalid play mode code {}", code),
        }
    }

    /// Seek in the current track
    pub fn seek_to(&self, position: Duration) -> Outcome {
        let _session = self.lock_session();
        let outcome = Outcome::from(self.engine.seek_to(position));
        tracing::debug!("seek_to {:?} -> {:?}", position, outcome);
        outcome
    }

    /// The current track reached its end
    ///
    /// Called by the audio backend, not by remote clients. The engine
    /// advances per play mode; a resulting track change is broadcast like
    /// any other.
    pub fn track_completed(&self) -> Option<Track> {
        let _session = self.lock_session();
        let before = self.engine.current_track();
        let track = self.engine.complete();
        self.announce_if_changed(before.as_ref(), track.as_ref());
        track
    }

    /// Release the engine's resources
    ///
    /// Must be the last call on this service; commands issued afterwards
    /// are not supported.
    pub fn release_playback_resources(&self) {
        let _session = self.lock_session();
        self.engine.release();
        tracing::info!("Play control released");
    }

    // ===== Reads (not serialized) =====

    /// Current track
    pub fn current_track(&self) -> Option<Track> {
        self.engine.current_track()
    }

    /// Index of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.engine.current_index()
    }

    /// Playback status
    pub fn status(&self) -> PlaybackStatus {
        self.engine.status()
    }

    /// Current play list
    pub fn play_list(&self) -> Vec<Track> {
        self.engine.track_list()
    }

    /// Current play mode
    pub fn play_mode(&self) -> PlayMode {
        self.engine.play_mode()
    }

    /// Playback position
    pub fn progress(&self) -> Duration {
        self.engine.progress()
    }

    // ===== Listener registration =====

    /// Subscribe to track changes (no-op if already registered)
    ///
    /// The listener is called inside the command critical section. It must
    /// not issue a mutating command on this service from its callback on the
    /// calling thread, or that command deadlocks.
    pub fn register_track_listener(&self, handle: TrackListenerHandle) {
        let id = handle.id();
        if self.track_listeners.register(handle) {
            tracing::debug!(listener = %id, "Track listener registered");
        }
    }

    /// Unsubscribe from track changes (no-op if not registered)
    pub fn unregister_track_listener(&self, id: ListenerId) {
        if self.track_listeners.unregister(id) {
            tracing::debug!(listener = %id, "Track listener unregistered");
        }
    }

    /// Subscribe to play started / stopped (no-op if already registered)
    ///
    /// Same precondition as [`register_track_listener`](Self::register_track_listener):
    /// no mutating command from inside a callback on the calling thread.
    pub fn register_status_listener(&self, handle: StatusListenerHandle) {
        let id = handle.id();
        if self.status_listeners.register(handle) {
            tracing::debug!(listener = %id, "Status listener registered");
        }
    }

    /// Unsubscribe from play started / stopped (no-op if not registered)
    pub fn unregister_status_listener(&self, id: ListenerId) {
        if self.status_listeners.unregister(id) {
            tracing::debug!(listener = %id, "Status listener unregistered");
        }
    }

    /// The transport lost the connection behind `id`
    ///
    /// Drops the handle from both registries.
    pub fn connection_died(&self, id: ListenerId) {
        self.track_listeners.kill(id);
        self.status_listeners.kill(id);
    }

    /// Number of registered track listeners
    pub fn track_listener_count(&self) -> usize {
        self.track_listeners.len()
    }

    /// Number of registered status listeners
    pub fn status_listener_count(&self) -> usize {
        self.status_listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ControlEvent, EventForwarder};
    use crossbeam_channel::{unbounded, Receiver};

    fn album() -> Vec<Track> {
        (1..=3)
            .map(|i| Track::new(format!("/music/{}.mp3", i), Duration::from_secs(180)))
            .collect()
    }

    fn control_with_events() -> (PlayControl<PlayController>, Receiver<ControlEvent>) {
        let control = PlayControl::new(album(), PlaybackConfig::default());
        let (tx, rx) = unbounded();
        let forwarder = Arc::new(EventForwarder::new(tx));
        let id = ListenerId::generate();
        control.register_track_listener(TrackListenerHandle::new(id, forwarder.clone()));
        control.register_status_listener(StatusListenerHandle::new(id, forwarder));
        (control, rx)
    }

    #[test]
    fn play_at_broadcasts_track_and_status() {
        let (control, rx) = control_with_events();

        assert_eq!(control.play_at(1), Outcome::Success);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ControlEvent::PlayStarted { index: 1, .. }));
        assert!(matches!(events[1], ControlEvent::TrackChanged { index: 1, .. }));
    }

    #[test]
    fn play_current_index_is_noop() {
        let (control, rx) = control_with_events();
        control.play_at(0);
        rx.try_iter().count();

        assert_eq!(control.play_at(0), Outcome::AlreadyCurrent);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn invalid_index_is_rejected_quietly() {
        let (control, rx) = control_with_events();
        assert_eq!(control.play_at(9), Outcome::InvalidArgument);
        assert_eq!(rx.try_iter().count(), 0);
        assert_eq!(control.current_index(), None);
    }

    #[test]
    fn pause_does_not_broadcast() {
        let (control, rx) = control_with_events();
        control.play_at(0);
        rx.try_iter().count();

        assert_eq!(control.pause(), Outcome::Success);
        assert_eq!(control.pause(), Outcome::Unknown);
        assert_eq!(control.resume(), Outcome::Success);

        // Resume reports play-started, never a track change
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ControlEvent::PlayStarted { .. }));
    }

    #[test]
    fn connection_death_removes_both_registrations() {
        let (control, _rx) = control_with_events();
        assert_eq!(control.track_listener_count(), 1);
        assert_eq!(control.status_listener_count(), 1);

        let id = ListenerId::generate();
        control.connection_died(id);
        assert_eq!(control.track_listener_count(), 1);

        let snapshot = control.track_listeners.snapshot();
        control.connection_died(snapshot[0].id());
        assert_eq!(control.track_listener_count(), 0);
        assert_eq!(control.status_listener_count(), 0);
    }
}
