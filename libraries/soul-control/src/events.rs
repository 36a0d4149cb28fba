//! Control events
//!
//! Message form of the listener callbacks, for transports that forward
//! notifications as messages instead of remote calls.

use crate::error::{DeliveryError, DeliveryResult};
use crate::listener::{RemoteListener, StatusListener, TrackListener};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use soul_playback::Track;

/// Events delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ControlEvent {
    /// Current track changed
    TrackChanged {
        /// The new current track
        track: Track,
        /// Its index in the play list
        index: usize,
    },

    /// A track started playing
    PlayStarted {
        /// The playing track
        track: Track,
        /// Its index in the play list
        index: usize,
    },

    /// A track reached its end
    PlayStopped {
        /// The finished track
        track: Track,
        /// Its index in the play list
        index: usize,
    },
}

impl ControlEvent {
    /// Track carried by the event
    pub fn track(&self) -> &Track {
        match self {
            ControlEvent::TrackChanged { track, .. }
            | ControlEvent::PlayStarted { track, .. }
            | ControlEvent::PlayStopped { track, .. } => track,
        }
    }

    /// Index carried by the event
    pub fn index(&self) -> usize {
        match self {
            ControlEvent::TrackChanged { index, .. }
            | ControlEvent::PlayStarted { index, .. }
            | ControlEvent::PlayStopped { index, .. } => *index,
        }
    }
}

/// Listener that forwards every callback into a channel
///
/// Registers as both a track and a status listener. Once the receiving end
/// is dropped, deliveries fail with [`DeliveryError::Disconnected`].
#[derive(Debug, Clone)]
pub struct EventForwarder {
    tx: Sender<ControlEvent>,
}

impl EventForwarder {
    /// Forward into `tx`
    pub fn new(tx: Sender<ControlEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: ControlEvent) -> DeliveryResult {
        self.tx.send(event).map_err(|_| DeliveryError::Disconnected)
    }
}

impl RemoteListener for EventForwarder {}

impl TrackListener for EventForwarder {
    fn on_track_changed(&self, track: &Track, index: usize) -> DeliveryResult {
        self.send(ControlEvent::TrackChanged {
            track: track.clone(),
            index,
        })
    }
}

impl StatusListener for EventForwarder {
    fn on_play_started(&self, track: &Track, index: usize) -> DeliveryResult {
        self.send(ControlEvent::PlayStarted {
            track: track.clone(),
            index,
        })
    }

    fn on_play_stopped(&self, track: &Track, index: usize) -> DeliveryResult {
        self.send(ControlEvent::PlayStopped {
            track: track.clone(),
            index,
        })
    }
}
