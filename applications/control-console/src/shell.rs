//! Runs parsed commands against the control service

use crate::command::Command;
use soul_control::{Outcome, PlayControl};
use soul_playback::{PlaybackEngine, Track};
use std::fmt::Write;

/// Execute `command` and return the text to print
///
/// `Quit` is handled by the caller and answers with an empty reply.
pub fn run_command<E: PlaybackEngine>(control: &PlayControl<E>, command: Command) -> String {
    match command {
        Command::Play(index) => outcome_reply(control.play_at(index)),
        Command::Next => track_reply(control.next().as_ref()),
        Command::Previous => track_reply(control.previous().as_ref()),
        Command::Pause => outcome_reply(control.pause()),
        Command::Resume => outcome_reply(control.resume()),
        Command::Seek(position) => outcome_reply(control.seek_to(position)),
        Command::Mode(code) => {
            control.set_play_mode(code);
            format!("mode: {:?}", control.play_mode())
        }
        Command::List => list_reply(&control.play_list(), control.current_index()),
        Command::Current => track_reply(control.current_track().as_ref()),
        Command::Status => format!("{:?}", control.status()),
        Command::Progress => {
            let total = control.current_track().map(|t| t.duration).unwrap_or_default();
            format!(
                "{:.1}s / {:.1}s",
                control.progress().as_secs_f64(),
                total.as_secs_f64()
            )
        }
        Command::Complete => track_reply(control.track_completed().as_ref()),
        Command::Quit => String::new(),
    }
}

fn outcome_reply(outcome: Outcome) -> String {
    format!("{:?} ({})", outcome, outcome.code())
}

fn describe(track: &Track) -> String {
    format!("{} - {}", track.artist, track.title)
}

fn track_reply(track: Option<&Track>) -> String {
    track.map_or_else(|| "no track".to_string(), describe)
}

fn list_reply(tracks: &[Track], current: Option<usize>) -> String {
    if tracks.is_empty() {
        return "play list is empty".to_string();
    }

    let mut reply = String::new();
    for (index, track) in tracks.iter().enumerate() {
        let marker = if current == Some(index) { '*' } else { ' ' };
        let _ = writeln!(reply, "{} {:>3}  {}", marker, index, describe(track));
    }
    reply.truncate(reply.trim_end().len());
    reply
}
