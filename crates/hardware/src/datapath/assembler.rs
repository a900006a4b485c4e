//! Word Assembler.
//!
//! Two halves of the same idea, each holding only a sub-word cursor beyond its
//! data register:
//! 1. **`Gatherer`:** packs narrow source words into the lanes of one wide staging word.
//! 2. **`Slicer`:** holds one wide source word and exposes its narrow lanes in turn.
//!
//! Lane 0 is always the least-significant lane.

use std::mem;

use crate::common::word::{OutputBeat, Strobe, Word};

/// Staging register that gathers `ratio` source words into one output word.
#[derive(Clone, Debug)]
pub struct Gatherer {
    staging: Vec<u8>,
    lane_bytes: usize,
    ratio: usize,
    /// Source words gathered into the current group.
    cursor: usize,
    /// Group is complete and waiting to be taken.
    sealed: bool,
}

impl Gatherer {
    /// Creates an empty gatherer for `ratio` lanes of `lane_bytes` each.
    pub fn new(lane_bytes: usize, ratio: usize) -> Self {
        Self {
            staging: vec![0; lane_bytes * ratio],
            lane_bytes,
            ratio,
            cursor: 0,
            sealed: false,
        }
    }

    /// Writes `word` into the next free lane. Filling the last lane seals the group.
    pub fn push(&mut self, word: &Word) {
        debug_assert!(!self.sealed, "push into a sealed group");
        let start = self.cursor * self.lane_bytes;
        let n = word.len().min(self.lane_bytes);
        self.staging[start..start + n].copy_from_slice(&word.as_bytes()[..n]);
        self.cursor += 1;
        if self.cursor == self.ratio {
            self.sealed = true;
        }
    }

    /// Closes a short group; the unfilled lanes stay zero.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// True once the group may be turned into a beat.
    #[inline]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Lanes filled so far.
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when nothing is staged.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cursor == 0 && !self.sealed
    }

    /// Source words per output word.
    #[inline]
    pub const fn ratio(&self) -> usize {
        self.ratio
    }

    /// Hands out the staged word and starts a fresh group.
    pub fn take(&mut self) -> Word {
        let fresh = vec![0; self.staging.len()];
        self.cursor = 0;
        self.sealed = false;
        Word::from_bytes(mem::replace(&mut self.staging, fresh))
    }

    /// Discards the staged group.
    pub fn clear(&mut self) {
        self.staging.iter_mut().for_each(|b| *b = 0);
        self.cursor = 0;
        self.sealed = false;
    }
}

/// Register holding one wide source word while its lanes are emitted.
#[derive(Clone, Debug)]
pub struct Slicer {
    held: Option<Word>,
    lane_bytes: usize,
    /// Lane currently exposed.
    cursor: usize,
    /// Lanes of the held word that carry at least one in-bounds byte.
    lanes: usize,
    /// In-bounds bytes of the held word.
    valid_bytes: usize,
}

impl Slicer {
    /// Creates an empty slicer producing lanes of `lane_bytes`.
    pub const fn new(lane_bytes: usize) -> Self {
        Self {
            held: None,
            lane_bytes,
            cursor: 0,
            lanes: 0,
            valid_bytes: 0,
        }
    }

    /// Loads a source word of which the first `valid_bytes` are in bounds.
    ///
    /// Only lanes touching those bytes will be emitted.
    pub fn load(&mut self, word: Word, valid_bytes: usize) {
        self.lanes = valid_bytes.div_ceil(self.lane_bytes);
        self.valid_bytes = valid_bytes;
        self.cursor = 0;
        self.held = if self.lanes == 0 { None } else { Some(word) };
    }

    /// Beat for the lane under the cursor.
    pub fn current(&self) -> Option<OutputBeat> {
        let word = self.held.as_ref()?;
        let consumed = self.cursor * self.lane_bytes;
        Some(OutputBeat::new(
            word.lane(self.cursor, self.lane_bytes),
            Strobe::prefix(self.valid_bytes.saturating_sub(consumed), self.lane_bytes),
        ))
    }

    /// True when the exposed lane is the held word's final one.
    #[inline]
    pub fn is_last_lane(&self) -> bool {
        self.held.is_some() && self.cursor + 1 == self.lanes
    }

    /// Moves to the next lane, releasing the word after its final lane.
    pub fn advance(&mut self) {
        if self.held.is_none() {
            return;
        }
        self.cursor += 1;
        if self.cursor >= self.lanes {
            self.held = None;
            self.cursor = 0;
            self.lanes = 0;
            self.valid_bytes = 0;
        }
    }

    /// Lane currently exposed.
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when no word is held.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    /// Drops the held word.
    pub fn clear(&mut self) {
        self.held = None;
        self.cursor = 0;
        self.lanes = 0;
        self.valid_bytes = 0;
    }
}
