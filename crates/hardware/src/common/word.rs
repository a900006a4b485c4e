//! Word and strobe representations.
//!
//! Words are stored as little-endian byte vectors: byte 0 is the
//! least-significant byte lane. This matches the bus convention that lane 0 of a
//! wide word carries the lowest-addressed byte, and lets words of any byte-multiple
//! width (up to 512 bits) share one type.

use std::fmt;

/// A fixed-width bus word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Word {
    bytes: Vec<u8>,
}

impl Word {
    /// Creates an all-zero word of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Wraps raw little-endian bytes.
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Builds a word of `len` bytes from the low bytes of `value`.
    ///
    /// Bytes beyond the eighth are zero.
    pub fn from_u64(value: u64, len: usize) -> Self {
        let mut bytes = vec![0; len];
        for (i, b) in bytes.iter_mut().enumerate().take(8) {
            *b = (value >> (8 * i)) as u8;
        }
        Self { bytes }
    }

    /// Returns the low 64 bits of the word.
    pub fn low_u64(&self) -> u64 {
        self.bytes
            .iter()
            .take(8)
            .enumerate()
            .fold(0, |acc, (i, &b)| acc | (u64::from(b) << (8 * i)))
    }

    /// Width of the word in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-width word.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Little-endian byte view.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extracts lane `lane` of width `lane_bytes` (lane 0 = least significant).
    ///
    /// Lanes that run off the end of the word are zero-filled.
    pub fn lane(&self, lane: usize, lane_bytes: usize) -> Self {
        let start = lane * lane_bytes;
        let mut out = vec![0; lane_bytes];
        if start < self.bytes.len() {
            let end = (start + lane_bytes).min(self.bytes.len());
            out[..end - start].copy_from_slice(&self.bytes[start..end]);
        }
        Self { bytes: out }
    }
}

impl fmt::Display for Word {
    /// Formats the word as most-significant-byte-first hex, e.g. `0x04030201`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.bytes.iter().rev() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Per-byte validity mask for one beat. Bit `i` covers byte lane `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Strobe {
    bits: u64,
    lanes: u8,
}

impl Strobe {
    /// Maximum number of byte lanes a strobe can describe.
    pub const MAX_LANES: usize = 64;

    /// Strobe with every lane valid.
    pub fn full(lanes: usize) -> Self {
        Self::prefix(lanes, lanes)
    }

    /// Strobe with no lane valid.
    pub fn none(lanes: usize) -> Self {
        Self::prefix(0, lanes)
    }

    /// Strobe with lanes `0..valid` set and the rest clear.
    pub fn prefix(valid: usize, lanes: usize) -> Self {
        debug_assert!(lanes <= Self::MAX_LANES);
        let valid = valid.min(lanes) as u32;
        Self {
            bits: super::math::low_mask(valid),
            lanes: lanes as u8,
        }
    }

    /// Raw strobe bits.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of byte lanes this strobe spans.
    #[inline]
    pub const fn lanes(&self) -> usize {
        self.lanes as usize
    }

    /// Whether lane `lane` carries a valid byte.
    #[inline]
    pub const fn is_valid(&self, lane: usize) -> bool {
        lane < self.lanes as usize && (self.bits >> lane) & 1 == 1
    }

    /// Number of valid lanes.
    #[inline]
    pub const fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True when every lane is valid.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.count() == self.lanes as usize
    }

    /// True when the valid lanes form a prefix starting at lane 0.
    pub const fn is_prefix(&self) -> bool {
        self.bits & self.bits.wrapping_add(1) == 0
    }
}

impl fmt::Display for Strobe {
    /// Formats the strobe MSB-first in binary, one digit per lane.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{:0width$b}", self.bits, width = self.lanes())
    }
}

/// One word transferred over the stream in a single accepted handshake.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputBeat {
    /// Beat payload.
    pub data: Word,
    /// Valid byte lanes of `data`.
    pub strobe: Strobe,
}

impl OutputBeat {
    /// Creates a beat.
    pub const fn new(data: Word, strobe: Strobe) -> Self {
        Self { data, strobe }
    }

    /// Bytes whose strobe bit is set, in lane order.
    pub fn valid_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.data
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|(lane, _)| self.strobe.is_valid(*lane))
            .map(|(_, &b)| b)
    }
}

impl fmt::Display for OutputBeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} strb={}", self.data, self.strobe)
    }
}
