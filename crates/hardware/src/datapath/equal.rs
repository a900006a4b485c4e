//! Equal-width datapath.
//!
//! Source words are already output-sized, so each one is pushed into the
//! decouple buffer as a finished beat. The buffer head becomes visible to the
//! consumer only once a batch is ready: the buffer has filled, or the final
//! word of the transfer has landed. Once visible, the batch drains until the
//! buffer is empty.

use tracing::error;

use super::mask::tail_strobe;
use super::ring::RingBuffer;
use super::{Transfer, WidthPath};
use crate::common::word::{OutputBeat, Word};
use crate::config::Geometry;

/// Pass-through path with a decouple buffer.
#[derive(Clone, Debug)]
pub struct EqualPath {
    ring: RingBuffer<OutputBeat>,
    lanes: usize,
    transfer: Transfer,
    /// Head is exposed to the consumer.
    producing: bool,
    /// Final word of the transfer is in the buffer (or already drained).
    final_landed: bool,
}

impl EqualPath {
    /// Creates the path with a buffer of the configured depth.
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            ring: RingBuffer::new(geometry.buffer_depth()),
            lanes: geometry.dst_bytes(),
            transfer: Transfer::default(),
            producing: false,
            final_landed: false,
        }
    }

    /// The decouple buffer.
    pub const fn buffer(&self) -> &RingBuffer<OutputBeat> {
        &self.ring
    }

    /// True while the buffer head is being offered downstream.
    pub const fn is_producing(&self) -> bool {
        self.producing
    }

    fn update_producing(&mut self) {
        if self.ring.is_empty() {
            self.producing = false;
        } else if self.ring.is_full() || self.final_landed {
            self.producing = true;
        }
    }
}

impl WidthPath for EqualPath {
    fn begin(&mut self, transfer: Transfer) {
        self.clear();
        self.transfer = transfer;
    }

    fn has_room(&self, landing: bool, _accepting: bool) -> bool {
        !(self.ring.is_full() || (landing && self.ring.is_near_full()))
    }

    fn land(&mut self, word: Word, index: u64) {
        let offset = index * self.lanes as u64;
        let strobe = tail_strobe(offset, self.lanes, self.transfer.total_bytes);
        if self.ring.push(OutputBeat::new(word, strobe)).is_err() {
            error!(index, "decouple buffer overflow, word dropped");
        }
        if self.transfer.is_last_word(index) {
            self.final_landed = true;
        }
        self.update_producing();
    }

    fn head(&self) -> Option<OutputBeat> {
        if self.producing {
            self.ring.front().cloned()
        } else {
            None
        }
    }

    fn accept(&mut self) {
        let _ = self.ring.pop();
        self.update_producing();
    }

    fn is_drained(&self) -> bool {
        self.ring.is_empty()
    }

    fn occupancy(&self) -> usize {
        self.ring.len()
    }

    fn cursor(&self) -> usize {
        0
    }

    fn clear(&mut self) {
        self.ring.clear();
        self.transfer = Transfer::default();
        self.producing = false;
        self.final_landed = false;
    }
}
