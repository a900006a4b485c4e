//! Trailing validity mask generation.
//!
//! A byte lane is valid iff the transfer offset it carries lies inside
//! `[0, total_bytes)`. Every datapath derives its strobes from this one rule,
//! which makes the valid lanes of a transfer sum to exactly `total_bytes`.

use crate::common::word::Strobe;

/// Strobe for a beat of `lanes` bytes whose lane 0 carries transfer byte `offset`.
///
/// Beats entirely inside the transfer get a full strobe; the beat straddling
/// `total_bytes` gets a prefix; beats past the end get an empty strobe.
///
/// ```
/// use memstream_core::datapath::mask::tail_strobe;
///
/// assert_eq!(tail_strobe(0, 4, 16).bits(), 0b1111);
/// assert_eq!(tail_strobe(12, 4, 14).bits(), 0b0011);
/// ```
pub fn tail_strobe(offset: u64, lanes: usize, total_bytes: u64) -> Strobe {
    let remaining = total_bytes.saturating_sub(offset);
    Strobe::prefix(remaining.min(lanes as u64) as usize, lanes)
}

/// Bytes of a `word_bytes`-wide word at `offset` that fall inside the transfer.
pub fn bytes_in_bounds(offset: u64, word_bytes: usize, total_bytes: u64) -> usize {
    total_bytes.saturating_sub(offset).min(word_bytes as u64) as usize
}
