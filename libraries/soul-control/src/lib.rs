//! Soul Player - Remote Playback Control
//!
//! Cross-process control service over a [`PlaybackEngine`](soul_playback::PlaybackEngine).
//!
//! This crate provides:
//! - [`PlayControl`], the facade that serializes mutating commands
//! - [`ListenerRegistry`], deduplicated listener sets keyed by [`ListenerId`]
//! - Broadcast of track changes and play started / stopped to listeners
//! - [`Outcome`] codes for results crossing the process boundary
//!
//! # Architecture
//!
//! Transport is out of scope: whatever carries calls between processes
//! wraps each subscribed client in a [`TrackListener`] or [`StatusListener`]
//! and reports dead connections through [`PlayControl::connection_died`].
//!
//! # Example
//!
//! ```rust
//! use soul_control::{ControlEvent, EventForwarder, ListenerId, Outcome, PlayControl, TrackListenerHandle};
//! use soul_playback::{PlaybackConfig, Track};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let tracks = vec![
//!     Track::new("/music/one.flac", Duration::from_secs(180)),
//!     Track::new("/music/two.flac", Duration::from_secs(240)),
//! ];
//! let control = PlayControl::new(tracks, PlaybackConfig::default());
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let forwarder = Arc::new(EventForwarder::new(tx));
//! control.register_track_listener(TrackListenerHandle::new(ListenerId::generate(), forwarder));
//!
//! assert_eq!(control.play_at(1), Outcome::Success);
//! assert!(matches!(rx.try_recv(), Ok(ControlEvent::TrackChanged { index: 1, .. })));
//! ```

mod control;
mod dispatch;
mod error;
mod events;
mod listener;
mod outcome;
mod registry;

// Public exports
pub use control::PlayControl;
pub use dispatch::{broadcast_status, broadcast_track_changed, DeliveryReport, StatusCallback};
pub use error::{DeliveryError, DeliveryResult};
pub use events::{ControlEvent, EventForwarder};
pub use listener::{
    ListenerHandle, ListenerId, RemoteListener, StatusListener, StatusListenerHandle,
    TrackListener, TrackListenerHandle,
};
pub use outcome::Outcome;
pub use registry::ListenerRegistry;
