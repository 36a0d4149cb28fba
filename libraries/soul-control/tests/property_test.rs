//! Property-based tests for the control facade
//!
//! Random command sequences must broadcast a track change exactly when the
//! current track identity changed, and every announced index must point at
//! the announced track.

use crossbeam_channel::{unbounded, Receiver};
use proptest::prelude::*;
use soul_control::{ControlEvent, EventForwarder, ListenerId, PlayControl, TrackListenerHandle};
use soul_playback::{PlaybackConfig, Track};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Play(usize),
    PlayAt(usize),
    Next,
    Previous,
    Pause,
    Resume,
    SetPlayList(usize),
    SetPlayMode(i32),
    Seek(u64),
    Complete,
}

fn track_pool() -> Vec<Track> {
    (0..6)
        .map(|i| Track::new(format!("/music/{}.flac", i), Duration::from_secs(60)))
        .collect()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..7usize).prop_map(Op::Play),
        (0..7usize).prop_map(Op::PlayAt),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Pause),
        Just(Op::Resume),
        (0..=6usize).prop_map(Op::SetPlayList),
        (-2..6i32).prop_map(Op::SetPlayMode),
        (0..90u64).prop_map(Op::Seek),
        Just(Op::Complete),
    ]
}

fn track_changes(rx: &Receiver<ControlEvent>) -> Vec<(Track, usize)> {
    rx.try_iter()
        .filter_map(|event| match event {
            ControlEvent::TrackChanged { track, index } => Some((track, index)),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn broadcast_iff_track_changed(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let pool = track_pool();
        let control = PlayControl::new(pool[..4].to_vec(), PlaybackConfig::default());
        let (tx, rx) = unbounded();
        control.register_track_listener(TrackListenerHandle::new(
            ListenerId::generate(),
            Arc::new(EventForwarder::new(tx)),
        ));

        for op in ops {
            let before = control.current_track();
            let mut replaced_list = None;

            match op {
                Op::Play(i) => {
                    let track = pool[i.min(pool.len() - 1)].clone();
                    control.play(&track);
                }
                Op::PlayAt(i) => {
                    control.play_at(i);
                }
                Op::Next => {
                    control.next();
                }
                Op::Previous => {
                    control.previous();
                }
                Op::Pause => {
                    control.pause();
                }
                Op::Resume => {
                    control.resume();
                }
                Op::SetPlayList(n) => {
                    control.set_play_list(pool[..n].to_vec());
                    replaced_list = Some(n);
                }
                Op::SetPlayMode(code) => control.set_play_mode(code),
                Op::Seek(secs) => {
                    control.seek_to(Duration::from_secs(secs));
                }
                Op::Complete => {
                    control.track_completed();
                }
            }

            let after = control.current_track();
            let changes = track_changes(&rx);
            let list = control.play_list();

            let expected = match replaced_list {
                Some(n) => usize::from(n > 0),
                None => usize::from(after.is_some() && before != after),
            };
            prop_assert_eq!(changes.len(), expected);

            for (track, index) in &changes {
                prop_assert_eq!(Some(track), list.get(*index));
                prop_assert_eq!(Some(track), after.as_ref());
            }
        }
    }

    #[test]
    fn invalid_mode_codes_never_change_mode(codes in prop::collection::vec(-50..50i32, 1..30)) {
        let control = PlayControl::new(track_pool(), PlaybackConfig::default());

        for code in codes {
            let before = control.play_mode();
            control.set_play_mode(code);
            if (0..=3).contains(&code) {
                prop_assert_eq!(control.play_mode().code(), code);
            } else {
                prop_assert_eq!(control.play_mode(), before);
            }
        }
    }
}
