//! Integer helpers used when sizing counters and control fields.

/// Ceiling base-2 logarithm.
///
/// Returns the number of bits needed to index `n` distinct values, so
/// `clog2(1) == 0`, `clog2(2) == 1`, `clog2(5) == 3`. `clog2(0)` is defined as 0.
///
/// ```
/// use memstream_core::common::clog2;
///
/// assert_eq!(clog2(4), 2);
/// assert_eq!(clog2(4097), 13);
/// ```
pub const fn clog2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        u64::BITS - (n - 1).leading_zeros()
    }
}

/// Bit mask with the low `bits` bits set.
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
