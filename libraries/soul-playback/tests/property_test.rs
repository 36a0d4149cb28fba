//! Property-based tests for the reference playback engine
//!
//! Uses proptest to verify invariants across many random command sequences.

use proptest::prelude::*;
use soul_playback::{
    navigation, PlayController, PlayMode, PlaybackConfig, PlaybackEngine, PlaybackStatus, Track,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

// ===== Helpers =====

fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::vec(("[a-z0-9]{1,10}", 1u64..600), 0..20).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, secs))| {
                Track::new(format!("/music/{i}-{name}.mp3"), Duration::from_secs(secs))
            })
            .collect()
    })
}

fn arbitrary_mode() -> impl Strategy<Value = PlayMode> {
    (PlayMode::MIN_CODE..=PlayMode::MAX_CODE).prop_map(|code| PlayMode::from_code(code).unwrap())
}

#[derive(Debug, Clone)]
enum Op {
    PlayAt(usize),
    Next,
    Previous,
    Pause,
    Resume,
    Complete,
    SetMode(PlayMode),
    Seek(u64),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..25).prop_map(Op::PlayAt),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Pause),
        Just(Op::Resume),
        Just(Op::Complete),
        arbitrary_mode().prop_map(Op::SetMode),
        (0u64..700).prop_map(Op::Seek),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: the current index is always None or a valid index
    #[test]
    fn current_index_always_valid(
        tracks in arbitrary_tracks(),
        mode in arbitrary_mode(),
        ops in prop::collection::vec(arbitrary_op(), 1..60),
        seed in any::<u64>(),
    ) {
        let len = tracks.len();
        let config = PlaybackConfig { play_mode: mode, ..Default::default() };
        let engine = PlayController::new(tracks, config).with_seed(seed);

        for op in ops {
            match op {
                Op::PlayAt(index) => { engine.play_at(index).ok(); }
                Op::Next => { engine.next(); }
                Op::Previous => { engine.previous(); }
                Op::Pause => { engine.pause().ok(); }
                Op::Resume => { engine.resume().ok(); }
                Op::Complete => { engine.complete(); }
                Op::SetMode(mode) => engine.set_play_mode(mode),
                Op::Seek(secs) => { engine.seek_to(Duration::from_secs(secs)).ok(); }
            }

            match engine.current_index() {
                Some(index) => {
                    prop_assert!(index < len, "index {} out of {}", index, len);
                    let listed = &engine.track_list()[index];
                    let current = engine.current_track();
                    prop_assert_eq!(current.as_ref(), Some(listed));
                }
                None => prop_assert!(engine.current_track().is_none()),
            }

            if engine.current_index().is_none() {
                prop_assert_ne!(engine.status(), PlaybackStatus::Started);
            }
        }
    }

    /// Property: progress never exceeds the current track's duration
    #[test]
    fn progress_within_track(
        tracks in arbitrary_tracks(),
        seeks in prop::collection::vec(0u64..700, 1..20),
    ) {
        prop_assume!(!tracks.is_empty());
        let engine = PlayController::new(tracks, PlaybackConfig::default());
        engine.play_at(0).unwrap();

        for secs in seeks {
            engine.seek_to(Duration::from_secs(secs)).ok();
            let duration = engine.current_track().unwrap().duration;
            prop_assert!(engine.progress() <= duration);
        }
    }

    /// Property: manual next in ordered modes visits the whole list in order
    #[test]
    fn ordered_next_cycles_through_list(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let mut rng = StdRng::seed_from_u64(0);
        let mut current = Some(start);

        for step in 1..=len {
            current = navigation::next_index(current, len, PlayMode::ListLoop, &mut rng);
            prop_assert_eq!(current, Some((start + step) % len));
        }
    }
}
