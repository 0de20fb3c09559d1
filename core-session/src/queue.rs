//! Play queue: ordered tracks, current index, and the selection policy.
//!
//! Pure data structure: no I/O, no timing. The distinction between manual
//! navigation (always moves) and automatic advance-on-completion (honors
//! repeat mode) lives in the controller, not here.

use core_library::Track;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Policy governing automatic advance on natural track completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Advance to the next mode: Off → All → One → Off.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Navigation direction for [`Queue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered track sequence with a current-position pointer.
///
/// Invariant: `current` is `Some` exactly when the sequence is non-empty, and
/// always a valid index into it.
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: SmallRng,
}

impl Queue {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Queue with a caller-supplied RNG; tests seed this for deterministic
    /// shuffle selection.
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            rng,
        }
    }

    /// Replace the queue contents. The start index is clamped into range;
    /// out-of-range input is not an error. An empty `tracks` clears the
    /// current pointer.
    pub fn set_tracks(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.current = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        self.tracks = tracks;
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether the current pointer sits on the final sequence position. The
    /// controller uses this for its repeat-off end-of-queue stop.
    pub fn is_on_last(&self) -> bool {
        !self.tracks.is_empty() && self.current == Some(self.tracks.len() - 1)
    }

    /// Move the current pointer and return the newly selected track.
    ///
    /// Shuffle on: a uniformly random index over the full range (immediate
    /// repeats of the same index are permitted). Shuffle off: linear ±1 with
    /// wraparound in both directions. Always lands on a track when the queue
    /// is non-empty.
    pub fn advance(&mut self, direction: Direction) -> Option<&Track> {
        let len = self.tracks.len();
        let current = self.current?;

        let next = if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            match direction {
                Direction::Next => {
                    if current + 1 >= len {
                        0
                    } else {
                        current + 1
                    }
                }
                Direction::Previous => {
                    if current == 0 {
                        len - 1
                    } else {
                        current - 1
                    }
                }
            }
        };

        self.current = Some(next);
        self.tracks.get(next)
    }

    /// Set the current pointer to an explicit index. Out-of-range input is a
    /// silent no-op returning `None`.
    pub fn jump_to(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.tracks.get(index)
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
