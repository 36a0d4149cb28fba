//! Remote listener handles
//!
//! A listener is whatever the transport hands us for a subscribed client:
//! a proxy that forwards callbacks across the process boundary. The
//! registry keys listeners by [`ListenerId`] (the identity of the
//! connection-side object), never by comparing listener values.

use crate::error::DeliveryResult;
use serde::{Deserialize, Serialize};
use soul_playback::Track;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a remote listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Generate a new random listener ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identity assigned by the transport
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behaviour shared by every remote listener
pub trait RemoteListener: Send + Sync {
    /// Whether the connection behind this handle is still up
    ///
    /// Dead handles are skipped during a broadcast.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Receives track-change notifications
pub trait TrackListener: RemoteListener {
    /// The current track changed to `track`, at `index` in the play list
    fn on_track_changed(&self, track: &Track, index: usize) -> DeliveryResult;
}

/// Receives play started / stopped notifications
pub trait StatusListener: RemoteListener {
    /// `track` started playing
    fn on_play_started(&self, track: &Track, index: usize) -> DeliveryResult;

    /// `track` reached its end
    fn on_play_stopped(&self, track: &Track, index: usize) -> DeliveryResult;
}

/// A listener together with its identity
pub struct ListenerHandle<L: ?Sized> {
    id: ListenerId,
    listener: Arc<L>,
}

impl<L: ?Sized> ListenerHandle<L> {
    /// Pair a listener with the identity the transport assigned to it
    pub fn new(id: ListenerId, listener: Arc<L>) -> Self {
        Self { id, listener }
    }

    /// Identity used as the registry key
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The listener itself
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Split into identity and listener
    pub fn into_parts(self) -> (ListenerId, Arc<L>) {
        (self.id, self.listener)
    }
}

impl<L: ?Sized> Clone for ListenerHandle<L> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<L: ?Sized> fmt::Debug for ListenerHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Handle to a track listener
pub type TrackListenerHandle = ListenerHandle<dyn TrackListener>;

/// Handle to a status listener
pub type StatusListenerHandle = ListenerHandle<dyn StatusListener>;
