//! Console listener: prints every broadcast as one JSON line

use serde::Serialize;
use soul_control::{
    ControlEvent, DeliveryError, DeliveryResult, RemoteListener, StatusListener, TrackListener,
};
use soul_playback::Track;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

pub struct ConsoleListener<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleListener<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn print<T: Serialize>(&self, event: &T) -> DeliveryResult {
        let line =
            serde_json::to_string(event).map_err(|e| DeliveryError::Remote(e.to_string()))?;
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", line)
            .and_then(|()| out.flush())
            .map_err(|e| DeliveryError::Remote(e.to_string()))
    }
}

impl<W: Write + Send> RemoteListener for ConsoleListener<W> {}

impl<W: Write + Send> TrackListener for ConsoleListener<W> {
    fn on_track_changed(&self, track: &Track, index: usize) -> DeliveryResult {
        self.print(&ControlEvent::TrackChanged {
            track: track.clone(),
            index,
        })
    }
}

impl<W: Write + Send> StatusListener for ConsoleListener<W> {
    fn on_play_started(&self, track: &Track, index: usize) -> DeliveryResult {
        self.print(&ControlEvent::PlayStarted {
            track: track.clone(),
            index,
        })
    }

    fn on_play_stopped(&self, track: &Track, index: usize) -> DeliveryResult {
        self.print(&ControlEvent::PlayStopped {
            track: track.clone(),
            index,
        })
    }
}
