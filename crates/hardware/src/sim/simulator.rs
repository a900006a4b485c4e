//! Simulator: owns the controller, the source port, and the statistics.
//!
//! Each [`Simulator::tick`] samples the port's registered response, clocks the
//! controller, then clocks the port with the advance the controller drove, so
//! a word requested on cycle `n` reaches the controller on cycle `n + 1`.

use std::fmt;

use tracing::debug;

use crate::common::error::{ConfigError, RequestError};
use crate::common::word::OutputBeat;
use crate::config::{Config, Geometry, ZeroLength};
use crate::controller::{ControllerState, TickInputs, TransferController, TransferRequest};
use crate::sim::consumer::ReadyPattern;
use crate::source::{SourcePort, SourceStore};
use crate::stats::TransferStats;

/// Signals observed during one simulated cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleTrace {
    /// Cycle number since the simulator was built.
    pub cycle: u64,
    /// Controller state during the cycle.
    pub state: ControllerState,
    /// Beat driven on the stream (`valid` when `Some`).
    pub beat: Option<OutputBeat>,
    /// Consumer `ready`.
    pub ready: bool,
    /// A handshake completed.
    pub accepted: bool,
    /// Address advanced, if any.
    pub fetch: Option<u64>,
    /// Ack register after the clock edge.
    pub ack: bool,
}

impl fmt::Display for CycleTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6} {:<5}", self.cycle, self.state.to_string())?;
        match &self.beat {
            Some(beat) => write!(f, " valid {beat}")?,
            None => write!(f, " -")?,
        }
        write!(f, " ready={}", u8::from(self.ready))?;
        if self.accepted {
            write!(f, " xfer")?;
        }
        if let Some(addr) = self.fetch {
            write!(f, " fetch@{addr}")?;
        }
        if self.ack {
            write!(f, " ACK")?;
        }
        Ok(())
    }
}

/// Result of driving one transfer to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Beats accepted by the consumer, in order.
    pub beats: Vec<OutputBeat>,
    /// Cycles from the enable pulse up to and including the ack edge.
    pub cycles: u64,
    /// Ack pulses observed, including one settle cycle after completion.
    pub acks: u32,
    /// Cycles with a valid beat the consumer did not take.
    pub stall_cycles: u64,
}

impl TransferOutcome {
    /// Bytes under set strobe bits, in stream order.
    pub fn payload(&self) -> Vec<u8> {
        self.beats.iter().flat_map(OutputBeat::valid_bytes).collect()
    }
}

/// Top-level simulator: converter plus its source.
#[derive(Debug)]
pub struct Simulator {
    controller: TransferController,
    port: SourcePort,
    stats: TransferStats,
    cycle: u64,
    max_cycles: u64,
    record: bool,
    history: Vec<CycleTrace>,
}

impl Simulator {
    /// Validates `config` and attaches `store` as the source.
    pub fn new(config: &Config, store: Box<dyn SourceStore>) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        if store.word_bytes() != geometry.src_bytes() {
            return Err(ConfigError::SourceWidthMismatch {
                store: store.word_bytes(),
                configured: geometry.src_bytes(),
            });
        }
        Ok(Self {
            controller: TransferController::new(geometry),
            port: SourcePort::new(store),
            stats: TransferStats::default(),
            cycle: 0,
            max_cycles: config.general.max_cycles,
            record: config.general.trace_transfers,
            history: Vec::new(),
        })
    }

    /// The converter under simulation.
    pub const fn controller(&self) -> &TransferController {
        &self.controller
    }

    /// Validated geometry.
    pub const fn geometry(&self) -> &Geometry {
        self.controller.geometry()
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &TransferStats {
        &self.stats
    }

    /// Cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Recorded cycle traces (only filled when transfer tracing is enabled).
    pub fn history(&self) -> &[CycleTrace] {
        &self.history
    }

    /// Advances every component by one clock edge.
    pub fn tick(&mut self, request: TransferRequest, ready: bool, reset: bool) -> CycleTrace {
        let state = self.controller.state();
        let beat = self.controller.stream();
        let inputs = TickInputs {
            request,
            ready,
            reset,
            source: self.port.response(),
        };

        let out = self.controller.tick(&inputs);
        self.port.tick(out.advance, reset);

        self.stats.cycles += 1;
        if out.advance.is_some() {
            self.stats.fetches += 1;
        }
        if let Some(accepted) = &out.accepted {
            self.stats.beats += 1;
            self.stats.bytes_delivered += accepted.strobe.count() as u64;
        }
        if out.stalled {
            self.stats.stall_cycles += 1;
        }
        if reset && state.is_busy() {
            self.stats.transfers_aborted += 1;
        }
        if self.controller.ack() {
            self.stats.transfers_completed += 1;
        }
        self.stats.buffer_high_water = self
            .stats
            .buffer_high_water
            .max(self.controller.buffer_occupancy());

        let trace = CycleTrace {
            cycle: self.cycle,
            state,
            beat,
            ready,
            accepted: out.accepted.is_some(),
            fetch: out.advance,
            ack: self.controller.ack(),
        };
        self.cycle += 1;

        if self.record {
            debug!(%trace, "cycle");
            self.history.push(trace.clone());
        }
        trace
    }

    /// Applies a synchronous reset for one cycle.
    pub fn reset(&mut self) -> CycleTrace {
        self.tick(TransferRequest::idle(), false, true)
    }

    /// Drives a full transfer of `total_bytes` against `pattern`.
    ///
    /// `enable` is pulsed on the first cycle. The run ends on the ack edge,
    /// followed by one settle cycle so the ack pulse is seen to fall.
    pub fn run_transfer(
        &mut self,
        total_bytes: u64,
        pattern: &ReadyPattern,
    ) -> Result<TransferOutcome, RequestError> {
        let state = self.controller.state();
        if state.is_busy() {
            return Err(RequestError::Busy { state });
        }
        let max = self.geometry().max_burst_len();
        if total_bytes > max {
            return Err(RequestError::BurstTooLong {
                requested: total_bytes,
                max,
            });
        }

        let mut outcome = TransferOutcome::default();
        if total_bytes == 0 && self.geometry().zero_length() == ZeroLength::Ignore {
            let _ = self.tick(TransferRequest::start(0), pattern.is_ready(0), false);
            outcome.cycles = 1;
            return Ok(outcome);
        }

        for local in 0..self.max_cycles {
            let request = if local == 0 {
                TransferRequest::start(total_bytes)
            } else {
                TransferRequest::idle()
            };
            let trace = self.tick(request, pattern.is_ready(local), false);
            Self::absorb(&trace, &mut outcome);

            if trace.ack {
                outcome.cycles = local + 1;
                let settle = self.tick(TransferRequest::idle(), pattern.is_ready(local + 1), false);
                Self::absorb(&settle, &mut outcome);
                return Ok(outcome);
            }
        }
        Err(RequestError::Timeout {
            cycles: self.max_cycles,
        })
    }

    fn absorb(trace: &CycleTrace, outcome: &mut TransferOutcome) {
        if trace.accepted {
            if let Some(beat) = &trace.beat {
                outcome.beats.push(beat.clone());
            }
        } else if trace.beat.is_some() {
            outcome.stall_cycles += 1;
        }
        if trace.ack {
            outcome.acks += 1;
        }
    }
}
