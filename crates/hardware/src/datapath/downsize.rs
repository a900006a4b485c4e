//! Downsizing datapath.
//!
//! Each fetched source word is held while its lanes are offered one per
//! accepted handshake. The next word may only be fetched in the cycle the held
//! word's final lane is accepted, so a fetch never overtakes an unread lane.
//! Lanes lying wholly past the end of the transfer are never offered.

use super::assembler::Slicer;
use super::mask::bytes_in_bounds;
use super::{Transfer, WidthPath};
use crate::common::word::{OutputBeat, Word};
use crate::config::Geometry;

/// Slicing path.
#[derive(Clone, Debug)]
pub struct DownsizePath {
    slicer: Slicer,
    src_bytes: usize,
    ratio: usize,
    transfer: Transfer,
}

impl DownsizePath {
    /// Creates the path for the geometry's ratio.
    pub const fn new(geometry: &Geometry) -> Self {
        Self {
            slicer: Slicer::new(geometry.dst_bytes()),
            src_bytes: geometry.src_bytes(),
            ratio: geometry.ratio(),
            transfer: Transfer {
                total_bytes: 0,
                words: 0,
            },
        }
    }

    /// Beats per source word.
    pub const fn ratio(&self) -> usize {
        self.ratio
    }
}

impl WidthPath for DownsizePath {
    fn begin(&mut self, transfer: Transfer) {
        self.clear();
        self.transfer = transfer;
    }

    fn has_room(&self, landing: bool, accepting: bool) -> bool {
        !landing && (self.slicer.is_empty() || (accepting && self.slicer.is_last_lane()))
    }

    fn land(&mut self, word: Word, index: u64) {
        let offset = index * self.src_bytes as u64;
        let valid = bytes_in_bounds(offset, self.src_bytes, self.transfer.total_bytes);
        self.slicer.load(word, valid);
    }

    fn head(&self) -> Option<OutputBeat> {
        self.slicer.current()
    }

    fn accept(&mut self) {
        self.slicer.advance();
    }

    fn is_drained(&self) -> bool {
        self.slicer.is_empty()
    }

    fn occupancy(&self) -> usize {
        usize::from(!self.slicer.is_empty())
    }

    fn cursor(&self) -> usize {
        self.slicer.cursor()
    }

    fn clear(&mut self) {
        self.slicer.clear();
        self.transfer = Transfer::default();
    }
}
