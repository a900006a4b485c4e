//! Per-cycle signal bundles crossing the controller boundary.
//!
//! 1. **Control:** `TransferRequest` carries `enable` and the requested byte count.
//! 2. **Source:** `SourceResponse` carries the word answering last cycle's advance.
//! 3. **Tick I/O:** `TickInputs` collects every input sampled on a clock edge,
//!    `TickOutputs` what the controller drove during that cycle.

use crate::common::word::{OutputBeat, Word};

/// Upstream control inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferRequest {
    /// Start strobe; sampled only while idle.
    pub enable: bool,
    /// Requested byte count, before truncation to the length field width.
    pub total_bytes: u64,
}

impl TransferRequest {
    /// No request this cycle.
    pub const fn idle() -> Self {
        Self {
            enable: false,
            total_bytes: 0,
        }
    }

    /// Enable pulse for a transfer of `total_bytes`.
    pub const fn start(total_bytes: u64) -> Self {
        Self {
            enable: true,
            total_bytes,
        }
    }
}

/// Word returned by the source store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceResponse {
    /// `Some` when `data_valid` is high.
    pub data: Option<Word>,
}

impl SourceResponse {
    /// `data_valid` signal.
    #[inline]
    pub const fn data_valid(&self) -> bool {
        self.data.is_some()
    }
}

/// Inputs sampled on one clock edge.
#[derive(Clone, Debug, Default)]
pub struct TickInputs {
    /// Control interface.
    pub request: TransferRequest,
    /// Consumer `ready`.
    pub ready: bool,
    /// Synchronous reset.
    pub reset: bool,
    /// Source data interface.
    pub source: SourceResponse,
}

/// What the controller drove during the cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutputs {
    /// Source address advanced this cycle, if any.
    pub advance: Option<u64>,
    /// Beat transferred by a valid/ready handshake this cycle.
    pub accepted: Option<OutputBeat>,
    /// A beat was valid but the consumer was not ready.
    pub stalled: bool,
}
