//! Broadcast dispatcher
//!
//! Delivers one event to every listener in a registry snapshot.
//!
//! One broadcast is one epoch:
//! 1. Snapshot the registry (the registry lock is released right away)
//! 2. For each handle: skip it if its connection is dead, otherwise call it
//! 3. A failing or panicking listener is logged and counted, then the loop
//!    moves on to the next handle
//! 4. Drop the snapshot
//!
//! Failed deliveries are not retried and the listener stays registered.

use crate::error::DeliveryResult;
use crate::listener::{RemoteListener, StatusListener, TrackListener};
use crate::registry::ListenerRegistry;
use soul_playback::{PlaybackStatus, Track};
use std::panic::{self, AssertUnwindSafe};

/// Outcome of one broadcast epoch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Listeners that accepted the event
    pub delivered: usize,

    /// Listeners whose callback failed or panicked
    pub failed: usize,

    /// Listeners skipped because their connection was dead
    pub skipped: usize,
}

impl DeliveryReport {
    /// Number of listeners in the snapshot
    pub fn total(&self) -> usize {
        self.delivered + self.failed + self.skipped
    }
}

/// Status listener callback selected for a playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCallback {
    /// `on_play_started`
    PlayStarted,

    /// `on_play_stopped`
    PlayStopped,
}

impl StatusCallback {
    /// Callback for `status`, `None` when the status is not forwarded
    pub fn for_status(status: PlaybackStatus) -> Option<Self> {
        match status {
            PlaybackStatus::Started => Some(StatusCallback::PlayStarted),
            PlaybackStatus::Completed => Some(StatusCallback::PlayStopped),
            PlaybackStatus::Idle | PlaybackStatus::Paused => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            StatusCallback::PlayStarted => "play-started",
            StatusCallback::PlayStopped => "play-stopped",
        }
    }

    fn invoke(self, listener: &dyn StatusListener, track: &Track, index: usize) -> DeliveryResult {
        match self {
            StatusCallback::PlayStarted => listener.on_play_started(track, index),
            StatusCallback::PlayStopped => listener.on_play_stopped(track, index),
        }
    }
}

/// Tell every track listener that the current track changed
pub fn broadcast_track_changed(
    registry: &ListenerRegistry<dyn TrackListener>,
    track: &Track,
    index: usize,
) -> DeliveryReport {
    let report = broadcast(registry, "track-changed", |listener| {
        listener.on_track_changed(track, index)
    });
    tracing::debug!(
        "Track change {:?} at {} delivered to {}/{} listeners",
        track.path,
        index,
        report.delivered,
        report.total()
    );
    report
}

/// Tell every status listener about a status change
///
/// Statuses without a callback (see [`StatusCallback::for_status`]) are
/// dropped here and produce an empty report.
pub fn broadcast_status(
    registry: &ListenerRegistry<dyn StatusListener>,
    track: &Track,
    index: usize,
    status: PlaybackStatus,
) -> DeliveryReport {
    let Some(callback) = StatusCallback::for_status(status) else {
        return DeliveryReport::default();
    };

    broadcast(registry, callback.name(), |listener| {
        callback.invoke(listener, track, index)
    })
}

fn broadcast<L, F>(registry: &ListenerRegistry<L>, event: &'static str, deliver: F) -> DeliveryReport
where
    L: RemoteListener + ?Sized,
    F: Fn(&L) -> DeliveryResult,
{
    let snapshot = registry.snapshot();
    let mut report = DeliveryReport::default();

    for handle in &snapshot {
        let listener = handle.listener();
        if !listener.is_alive() {
            tracing::debug!(listener = %handle.id(), "Skipping dead listener for {}", event);
            report.skipped += 1;
            continue;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| deliver(listener))) {
            Ok(Ok(())) => report.delivered += 1,
            Ok(Err(e)) => {
                tracing::warn!(listener = %handle.id(), "Failed to deliver {}: {}", event, e);
                report.failed += 1;
            }
            Err(_) => {
                tracing::warn!(listener = %handle.id(), "Listener panicked during {}", event);
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::listener::{ListenerId, StatusListenerHandle, TrackListenerHandle};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct Counter {
        track_changes: AtomicUsize,
        started: AtomicUsize,
        stopped: AtomicUsize,
        dead: AtomicBool,
    }

    impl RemoteListener for Counter {
        fn is_alive(&self) -> bool {
            !self.dead.load(Ordering::SeqCst)
        }
    }

    impl TrackListener for Counter {
        fn on_track_changed(&self, _track: &Track, _index: usize) -> DeliveryResult {
            self.track_changes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl StatusListener for Counter {
        fn on_play_started(&self, _track: &Track, _index: usize) -> DeliveryResult {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_play_stopped(&self, _track: &Track, _index: usize) -> DeliveryResult {
            self.stopped.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Broken;

    impl RemoteListener for Broken {}

    impl TrackListener for Broken {
        fn on_track_changed(&self, _track: &Track, _index: usize) -> DeliveryResult {
            Err(DeliveryError::Remote("boom".to_string()))
        }
    }

    struct Panicking;

    impl RemoteListener for Panicking {}

    impl TrackListener for Panicking {
        fn on_track_changed(&self, _track: &Track, _index: usize) -> DeliveryResult {
            panic!("listener bug");
        }
    }

    fn track() -> Track {
        Track::new("/music/1.mp3", Duration::from_secs(180))
    }

    fn track_registry() -> ListenerRegistry<dyn TrackListener> {
        ListenerRegistry::new()
    }

    #[test]
    fn status_mapping_is_exhaustive() {
        assert_eq!(
            StatusCallback::for_status(PlaybackStatus::Started),
            Some(StatusCallback::PlayStarted)
        );
        assert_eq!(
            StatusCallback::for_status(PlaybackStatus::Completed),
            Some(StatusCallback::PlayStopped)
        );
        assert_eq!(StatusCallback::for_status(PlaybackStatus::Idle), None);
        assert_eq!(StatusCallback::for_status(PlaybackStatus::Paused), None);
    }

    #[test]
    fn failing_listeners_do_not_block_others() {
        let registry = track_registry();
        let good = Arc::new(Counter::default());

        registry.register(TrackListenerHandle::new(ListenerId::generate(), Arc::new(Broken)));
        registry.register(TrackListenerHandle::new(ListenerId::generate(), Arc::new(Panicking)));
        registry.register(TrackListenerHandle::new(ListenerId::generate(), good.clone()));

        let report = broadcast_track_changed(&registry, &track(), 0);

        assert_eq!(
            report,
            DeliveryReport {
                delivered: 1,
                failed: 2,
                skipped: 0
            }
        );
        assert_eq!(good.track_changes.load(Ordering::SeqCst), 1);
        // Failing listeners stay registered
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn dead_listeners_are_skipped() {
        let registry = track_registry();
        let dead = Arc::new(Counter::default());
        dead.dead.store(true, Ordering::SeqCst);
        registry.register(TrackListenerHandle::new(ListenerId::generate(), dead.clone()));

        let report = broadcast_track_changed(&registry, &track(), 0);

        assert_eq!(report.skipped, 1);
        assert_eq!(dead.track_changes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn status_broadcast_selects_callback() {
        let registry: ListenerRegistry<dyn StatusListener> = ListenerRegistry::new();
        let counter = Arc::new(Counter::default());
        registry.register(StatusListenerHandle::new(ListenerId::generate(), counter.clone()));

        broadcast_status(&registry, &track(), 0, PlaybackStatus::Started);
        broadcast_status(&registry, &track(), 0, PlaybackStatus::Completed);
        let dropped = broadcast_status(&registry, &track(), 0, PlaybackStatus::Paused);
        broadcast_status(&registry, &track(), 0, PlaybackStatus::Idle);

        assert_eq!(dropped.total(), 0);
        assert_eq!(counter.started.load(Ordering::SeqCst), 1);
        assert_eq!(counter.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let report = broadcast_track_changed(&track_registry(), &track(), 0);
        assert_eq!(report, DeliveryReport::default());
    }
}
