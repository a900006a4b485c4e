//! In-memory source store.

use super::SourceStore;
use crate::common::word::Word;

/// Source store over a flat byte image.
///
/// Reads that run past the end of the image return zero bytes.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    image: Vec<u8>,
    word_bytes: usize,
}

impl MemoryStore {
    /// Wraps `image`, serving words of `word_bytes`.
    pub const fn new(image: Vec<u8>, word_bytes: usize) -> Self {
        Self { image, word_bytes }
    }

    /// Image of `len` bytes where byte `i` holds `i mod 256`.
    pub fn counting(len: usize, word_bytes: usize) -> Self {
        let image = (0..len).map(|i| i as u8).collect();
        Self::new(image, word_bytes)
    }

    /// The backing image.
    pub fn image(&self) -> &[u8] {
        &self.image
    }
}

impl SourceStore for MemoryStore {
    fn read_word(&mut self, address: u64) -> Word {
        let mut bytes = vec![0; self.word_bytes];
        let start = usize::try_from(address)
            .ok()
            .and_then(|a| a.checked_mul(self.word_bytes))
            .unwrap_or(usize::MAX);
        if start < self.image.len() {
            let end = (start + self.word_bytes).min(self.image.len());
            bytes[..end - start].copy_from_slice(&self.image[start..end]);
        }
        Word::from_bytes(bytes)
    }

    fn word_bytes(&self) -> usize {
        self.word_bytes
    }
}
