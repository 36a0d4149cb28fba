//! Soul Player - Playback State Machine
//!
//! Platform-agnostic playback state for Soul Remote Control.
//!
//! This crate provides:
//! - Track, play mode and playback status types
//! - The [`PlaybackEngine`] contract consumed by the control layer
//! - [`PlayController`], an in-memory reference engine
//! - Play modes (Default, Single loop, List loop, Random)
//! - Playback history for "previous" in random mode
//!
//! # Architecture
//!
//! `soul-playback` knows nothing about remote callers or listeners:
//! - No locking across commands (the control layer serializes them)
//! - No event fan-out (status changes go to one [`StatusObserver`])
//! - No audio decoding (backends implement [`PlaybackEngine`])
//!
//! # Example
//!
//! ```rust
//! use soul_playback::{PlayController, PlaybackConfig, PlaybackEngine, PlaybackStatus, Track};
//! use std::time::Duration;
//!
//! let tracks = vec![
//!     Track::new("/music/one.flac", Duration::from_secs(180)),
//!     Track::new("/music/two.flac", Duration::from_secs(240)),
//! ];
//! let engine = PlayController::new(tracks, PlaybackConfig::default());
//!
//! engine.play_at(0).unwrap();
//! assert_eq!(engine.status(), PlaybackStatus::Started);
//!
//! let next = engine.next().unwrap();
//! assert_eq!(next.title, "two");
//! ```

mod controller;
mod engine;
mod error;
mod history;
pub mod navigation;
pub mod types;

// Public exports
pub use controller::PlayController;
pub use engine::{NoopObserver, PlaybackEngine, StatusObserver};
pub use error::{PlaybackError, Result};
pub use types::{PlayMode, PlaybackConfig, PlaybackStatus, Track};
