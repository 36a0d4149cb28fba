//! Track navigation per play mode
//!
//! Pure index arithmetic: given the current index, the list length and the
//! play mode, pick the index of the track that plays next.

use crate::types::PlayMode;
use rand::Rng;

/// Index chosen by a manual "next" command
///
/// Manual skips always wrap around, whatever the mode. Random mode picks
/// any index, including the current one.
pub fn next_index<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    mode: PlayMode,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        PlayMode::Random => Some(rng.gen_range(0..len)),
        PlayMode::Default | PlayMode::SingleLoop | PlayMode::ListLoop => {
            Some(current.map_or(0, |index| (index + 1) % len))
        }
    }
}

/// Index chosen by a manual "previous" command
///
/// Random mode is handled by the caller through the playback history; this
/// falls back to a random pick when the history is exhausted.
pub fn previous_index<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    mode: PlayMode,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        PlayMode::Random => Some(rng.gen_range(0..len)),
        PlayMode::Default | PlayMode::SingleLoop | PlayMode::ListLoop => {
            Some(current.map_or(0, |index| (index + len - 1) % len))
        }
    }
}

/// Index that follows a natural end of track
///
/// `None` means playback stops (default mode after the last track).
pub fn completion_index<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    mode: PlayMode,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        PlayMode::SingleLoop => Some(current.unwrap_or(0)),
        PlayMode::ListLoop => Some(current.map_or(0, |index| (index + 1) % len)),
        PlayMode::Default => match current {
            Some(index) if index + 1 < len => Some(index + 1),
            Some(_) => None,
            None => Some(0),
        },
        PlayMode::Random => Some(rng.gen_range(0..len)),
    }
}
