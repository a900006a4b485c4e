//! Upsizing datapath.
//!
//! `ratio` consecutive source words are gathered into one output word. A
//! complete group moves into the single-entry output register as soon as it is
//! free, and stays there (valid, unchanged) until the consumer accepts it.
//! While a complete group waits for the output register, no further words are
//! fetched.

use super::assembler::Gatherer;
use super::mask::tail_strobe;
use super::{Transfer, WidthPath};
use crate::common::word::{OutputBeat, Word};
use crate::config::Geometry;

/// Gathering path with a one-beat output register.
#[derive(Clone, Debug)]
pub struct UpsizePath {
    gather: Gatherer,
    out: Option<OutputBeat>,
    lanes: usize,
    transfer: Transfer,
    /// Transfer byte offset of the group being gathered.
    group_offset: u64,
}

impl UpsizePath {
    /// Creates the path for the geometry's ratio.
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            gather: Gatherer::new(geometry.src_bytes(), geometry.ratio()),
            out: None,
            lanes: geometry.dst_bytes(),
            transfer: Transfer::default(),
            group_offset: 0,
        }
    }

    /// Source words per beat.
    pub const fn ratio(&self) -> usize {
        self.gather.ratio()
    }

    /// Beat waiting in the output register.
    pub const fn output_register(&self) -> Option<&OutputBeat> {
        self.out.as_ref()
    }

    /// Moves a sealed group into the output register if it is free.
    fn promote(&mut self) {
        if self.gather.is_sealed() && self.out.is_none() {
            let data = self.gather.take();
            let strobe = tail_strobe(self.group_offset, self.lanes, self.transfer.total_bytes);
            self.out = Some(OutputBeat::new(data, strobe));
            self.group_offset += self.lanes as u64;
        }
    }
}

impl WidthPath for UpsizePath {
    fn begin(&mut self, transfer: Transfer) {
        self.clear();
        self.transfer = transfer;
    }

    fn has_room(&self, landing: bool, _accepting: bool) -> bool {
        !self.gather.is_sealed() && self.gather.cursor() + usize::from(landing) < self.ratio()
    }

    fn land(&mut self, word: Word, index: u64) {
        self.gather.push(&word);
        if self.transfer.is_last_word(index) {
            self.gather.seal();
        }
        self.promote();
    }

    fn head(&self) -> Option<OutputBeat> {
        self.out.clone()
    }

    fn accept(&mut self) {
        self.out = None;
        self.promote();
    }

    fn is_drained(&self) -> bool {
        self.out.is_none() && self.gather.is_empty()
    }

    fn occupancy(&self) -> usize {
        usize::from(self.out.is_some()) + usize::from(self.gather.is_sealed())
    }

    fn cursor(&self) -> usize {
        self.gather.cursor()
    }

    fn clear(&mut self) {
        self.gather.clear();
        self.out = None;
        self.transfer = Transfer::default();
        self.group_offset = 0;
    }
}
