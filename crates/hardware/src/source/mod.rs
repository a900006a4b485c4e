//! Source store interface.
//!
//! This module models the addressed word source the converter reads from. It provides:
//! 1. **Store:** The `SourceStore` trait, an opaque word-addressed reader.
//! 2. **Memory:** `MemoryStore`, a store backed by a byte image.
//! 3. **Port:** `SourcePort`, which adds the one-cycle read latency between an
//!    address advance and `data_valid`.

/// Byte-image backed store.
pub mod memory;

/// Latency-modelling read port.
pub mod port;

pub use self::memory::MemoryStore;
pub use self::port::SourcePort;

use crate::common::word::Word;

/// Trait for stores the converter can fetch source words from.
///
/// Addresses are word indices: address `n` names bytes
/// `n * word_bytes() .. (n + 1) * word_bytes()`.
pub trait SourceStore: Send {
    /// Reads the word at `address`.
    fn read_word(&mut self, address: u64) -> Word;

    /// Width of every word this store returns, in bytes.
    fn word_bytes(&self) -> usize;
}
