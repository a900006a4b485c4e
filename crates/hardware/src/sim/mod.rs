//! Simulation harness.
//!
//! This module wires the converter to its collaborators. It provides:
//! 1. **Consumer:** `ReadyPattern` models of the downstream `ready` signal.
//! 2. **Simulator:** Clocks controller, source port, and statistics together and
//!    drives whole transfers.

/// Downstream consumer models.
pub mod consumer;

/// Top-level simulator.
pub mod simulator;

pub use self::consumer::ReadyPattern;
pub use self::simulator::{CycleTrace, Simulator, TransferOutcome};
