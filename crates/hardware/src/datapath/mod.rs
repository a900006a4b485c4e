//! Width-conversion datapaths.
//!
//! This module defines the strategy split between the three structural variants:
//! 1. **`WidthPath`:** The interface the transfer controller drives every cycle.
//! 2. **`Datapath`:** Enum dispatch over the variant selected at construction.
//! 3. **Building blocks:** Validity masks, the decouple ring, and the word assembler.
//!
//! Exactly one variant exists per converter; the ratio is never re-examined per tick.

/// Word assembler (gather for upsizing, slice for downsizing).
pub mod assembler;

/// Downsizing path: one source word becomes several beats.
pub mod downsize;

/// Equal-width path: source words pass through the decouple buffer.
pub mod equal;

/// Trailing validity mask generation.
pub mod mask;

/// Fixed-capacity circular queue.
pub mod ring;

/// Upsizing path: several source words become one beat.
pub mod upsize;

use std::fmt;

pub use self::downsize::DownsizePath;
pub use self::equal::EqualPath;
pub use self::ring::RingBuffer;
pub use self::upsize::UpsizePath;

use crate::common::word::{OutputBeat, Word};
use crate::config::Geometry;

/// Width-ratio strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Source and output words have the same width.
    Equal,
    /// Output words are `ratio` times wider than source words.
    Upsize {
        /// Source words per output word.
        ratio: usize,
    },
    /// Source words are `ratio` times wider than output words.
    Downsize {
        /// Output words per source word.
        ratio: usize,
    },
}

impl Strategy {
    /// Picks the strategy for a pair of word sizes in bytes.
    ///
    /// Returns `None` unless one size is a power-of-two multiple of the other.
    pub fn select(src_bytes: usize, dst_bytes: usize) -> Option<Self> {
        if src_bytes == 0 || dst_bytes == 0 {
            return None;
        }
        let (wide, narrow) = if dst_bytes >= src_bytes {
            (dst_bytes, src_bytes)
        } else {
            (src_bytes, dst_bytes)
        };
        if wide % narrow != 0 {
            return None;
        }
        let ratio = wide / narrow;
        if !ratio.is_power_of_two() {
            return None;
        }
        Some(match src_bytes.cmp(&dst_bytes) {
            std::cmp::Ordering::Equal => Self::Equal,
            std::cmp::Ordering::Less => Self::Upsize { ratio },
            std::cmp::Ordering::Greater => Self::Downsize { ratio },
        })
    }

    /// Ratio between the wider and the narrower word (1 for `Equal`).
    pub const fn ratio(&self) -> usize {
        match self {
            Self::Equal => 1,
            Self::Upsize { ratio } | Self::Downsize { ratio } => *ratio,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Upsize { ratio } => write!(f, "upsize x{ratio}"),
            Self::Downsize { ratio } => write!(f, "downsize x{ratio}"),
        }
    }
}

/// The request a transfer was started with, latched for its whole duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Requested length in bytes.
    pub total_bytes: u64,
    /// Source words the transfer needs.
    pub words: u64,
}

impl Transfer {
    /// Latches a request of `total_bytes` against a geometry.
    pub const fn new(total_bytes: u64, geometry: &Geometry) -> Self {
        Self {
            total_bytes,
            words: geometry.words_for(total_bytes),
        }
    }

    /// True when `index` is the final source word of the transfer.
    #[inline]
    pub const fn is_last_word(&self, index: u64) -> bool {
        index + 1 >= self.words
    }
}

/// Interface between the transfer controller and a width-conversion datapath.
///
/// All methods operate on the *next-state* copy of the datapath during a tick,
/// except `has_room` and `head`, which the controller evaluates on the current
/// state before anything is committed.
pub trait WidthPath {
    /// Prepares for a new transfer, dropping anything left from the last one.
    fn begin(&mut self, transfer: Transfer);

    /// Whether a source word fetched this cycle is guaranteed somewhere to land.
    ///
    /// # Arguments
    ///
    /// * `landing` - A previously fetched word arrives this cycle.
    /// * `accepting` - The consumer takes the current head this cycle.
    fn has_room(&self, landing: bool, accepting: bool) -> bool;

    /// Absorbs source word number `index` of the current transfer.
    fn land(&mut self, word: Word, index: u64);

    /// Current output beat, if the datapath is presenting one.
    fn head(&self) -> Option<OutputBeat>;

    /// Retires the current head after a completed handshake.
    fn accept(&mut self);

    /// True once nothing of the transfer remains to hand downstream.
    fn is_drained(&self) -> bool;

    /// Beats or groups currently held.
    fn occupancy(&self) -> usize;

    /// Sub-word cursor (0 for the equal-width path).
    fn cursor(&self) -> usize;

    /// Returns to the power-on state.
    fn clear(&mut self);
}

/// Enum dispatch over the selected datapath variant.
#[derive(Clone, Debug)]
pub enum Datapath {
    /// Equal-width pass-through via the decouple buffer.
    Equal(EqualPath),
    /// Gather several source words per beat.
    Upsize(UpsizePath),
    /// Slice each source word into several beats.
    Downsize(DownsizePath),
}

impl Datapath {
    /// Builds the variant matching the geometry's strategy.
    pub fn for_geometry(geometry: &Geometry) -> Self {
        match geometry.strategy() {
            Strategy::Equal => Self::Equal(EqualPath::new(geometry)),
            Strategy::Upsize { .. } => Self::Upsize(UpsizePath::new(geometry)),
            Strategy::Downsize { .. } => Self::Downsize(DownsizePath::new(geometry)),
        }
    }

    /// Strategy this datapath implements.
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Equal(_) => Strategy::Equal,
            Self::Upsize(p) => Strategy::Upsize { ratio: p.ratio() },
            Self::Downsize(p) => Strategy::Downsize { ratio: p.ratio() },
        }
    }
}

impl WidthPath for Datapath {
    fn begin(&mut self, transfer: Transfer) {
        match self {
            Self::Equal(p) => p.begin(transfer),
            Self::Upsize(p) => p.begin(transfer),
            Self::Downsize(p) => p.begin(transfer),
        }
    }

    fn has_room(&self, landing: bool, accepting: bool) -> bool {
        match self {
            Self::Equal(p) => p.has_room(landing, accepting),
            Self::Upsize(p) => p.has_room(landing, accepting),
            Self::Downsize(p) => p.has_room(landing, accepting),
        }
    }

    fn land(&mut self, word: Word, index: u64) {
        match self {
            Self::Equal(p) => p.land(word, index),
            Self::Upsize(p) => p.land(word, index),
            Self::Downsize(p) => p.land(word, index),
        }
    }

    fn head(&self) -> Option<OutputBeat> {
        match self {
            Self::Equal(p) => p.head(),
            Self::Upsize(p) => p.head(),
            Self::Downsize(p) => p.head(),
        }
    }

    fn accept(&mut self) {
        match self {
            Self::Equal(p) => p.accept(),
            Self::Upsize(p) => p.accept(),
            Self::Downsize(p) => p.accept(),
        }
    }

    fn is_drained(&self) -> bool {
        match self {
            Self::Equal(p) => p.is_drained(),
            Self::Upsize(p) => p.is_drained(),
            Self::Downsize(p) => p.is_drained(),
        }
    }

    fn occupancy(&self) -> usize {
        match self {
            Self::Equal(p) => p.occupancy(),
            Self::Upsize(p) => p.occupancy(),
            Self::Downsize(p) => p.occupancy(),
        }
    }

    fn cursor(&self) -> usize {
        match self {
            Self::Equal(p) => p.cursor(),
            Self::Upsize(p) => p.cursor(),
            Self::Downsize(p) => p.cursor(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Equal(p) => p.clear(),
            Self::Upsize(p) => p.clear(),
            Self::Downsize(p) => p.clear(),
        }
    }
}
