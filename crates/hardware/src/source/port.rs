//! Source read port.
//!
//! The port registers the word read for an address advance and presents it
//! with `data_valid` on the following cycle.

use std::fmt;

use super::SourceStore;
use crate::common::word::Word;
use crate::controller::SourceResponse;

/// One-cycle-latency port in front of a [`SourceStore`].
pub struct SourcePort {
    store: Box<dyn SourceStore>,
    pending: Option<Word>,
    reads: u64,
}

impl SourcePort {
    /// Wraps a store.
    pub fn new(store: Box<dyn SourceStore>) -> Self {
        Self {
            store,
            pending: None,
            reads: 0,
        }
    }

    /// Word width of the underlying store.
    pub fn word_bytes(&self) -> usize {
        self.store.word_bytes()
    }

    /// What the port drives this cycle.
    pub fn response(&self) -> SourceResponse {
        SourceResponse {
            data: self.pending.clone(),
        }
    }

    /// Samples the advance driven this cycle. Reset drops any registered word.
    pub fn tick(&mut self, advance: Option<u64>, reset: bool) {
        self.pending = if reset {
            None
        } else {
            advance.map(|address| {
                self.reads += 1;
                self.store.read_word(address)
            })
        };
    }

    /// Total reads served.
    pub const fn reads(&self) -> u64 {
        self.reads
    }

    /// Drops any registered word.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl fmt::Debug for SourcePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePort")
            .field("word_bytes", &self.store.word_bytes())
            .field("pending", &self.pending)
            .field("reads", &self.reads)
            .finish()
    }
}
