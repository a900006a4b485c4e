//! Error definitions.
//!
//! The clocked interface of the converter has no error channel: stalls are
//! backpressure and reset is an abort. Errors only arise around it:
//! 1. **Configuration:** Widths, ratios, and buffer sizes rejected before a controller is built.
//! 2. **Requests:** Whole-transfer requests the simulator refuses or that never finish.
//! 3. **Consumer patterns:** Unparseable ready-pattern descriptions.

use std::fmt;

use thiserror::Error;

use crate::controller::ControllerState;

/// Which side of the converter a width belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordSide {
    /// The addressed source store.
    Source,
    /// The output stream.
    Output,
}

impl fmt::Display for WordSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Configuration rejected at validation time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A word width is zero or not a whole number of bytes.
    #[error("{side} word width must be a non-zero multiple of 8 bits, got {bits}")]
    WidthNotByteMultiple {
        /// Offending side.
        side: WordSide,
        /// Configured width in bits.
        bits: u32,
    },

    /// A word width exceeds what a strobe can describe.
    #[error("{side} word width {bits} exceeds the {max}-bit limit")]
    WidthTooWide {
        /// Offending side.
        side: WordSide,
        /// Configured width in bits.
        bits: u32,
        /// Largest supported width in bits.
        max: u32,
    },

    /// Source and output widths are not related by a power of two.
    #[error("width ratio {src_bits}:{dst_bits} is not a power of two")]
    RatioNotPowerOfTwo {
        /// Source word width in bits.
        src_bits: u32,
        /// Output word width in bits.
        dst_bits: u32,
    },

    /// The decouple buffer depth is not a power of two of at least 2.
    #[error("decouple buffer depth {0} must be a power of two and at least 2")]
    BufferDepth(usize),

    /// A burst length of zero leaves no room for any transfer.
    #[error("max burst length must be non-zero")]
    ZeroBurst,

    /// The attached source store delivers words of a different width.
    #[error("source store delivers {store}-byte words but the datapath expects {configured}")]
    SourceWidthMismatch {
        /// Word size reported by the store.
        store: usize,
        /// Word size derived from the configuration.
        configured: usize,
    },

    /// Configuration JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// A whole-transfer request that could not be carried out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The requested length is larger than the configured burst limit.
    #[error("requested {requested} bytes exceeds the maximum burst of {max}")]
    BurstTooLong {
        /// Requested byte count.
        requested: u64,
        /// Configured maximum burst length.
        max: u64,
    },

    /// A transfer is already in flight.
    #[error("controller is busy ({state})")]
    Busy {
        /// State the controller was found in.
        state: ControllerState,
    },

    /// The transfer did not acknowledge within the cycle budget.
    #[error("transfer did not complete within {cycles} cycles")]
    Timeout {
        /// Cycles spent before giving up.
        cycles: u64,
    },
}

/// A ready-pattern description that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid ready pattern `{input}`: {reason}")]
pub struct PatternError {
    /// The text that failed to parse.
    pub input: String,
    /// Why it was rejected.
    pub reason: &'static str,
}
