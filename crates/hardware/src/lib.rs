//! Streaming memory-to-stream width converter library.
//!
//! This crate implements a cycle-accurate model of a converter that fetches
//! fixed-width words from an addressed source and repacks them into a
//! ready/valid stream of another width:
//! 1. **Datapath:** Equal-width, upsizing, and downsizing variants, the decouple ring, and tail masks.
//! 2. **Controller:** The transfer state machine with its address and byte counters.
//! 3. **Source:** The word store interface and its one-cycle read port.
//! 4. **Simulation:** Consumer ready patterns, the top-level simulator, and statistics.
//! 5. **Configuration:** Serde-backed parameters validated into a fixed geometry.

/// Common types (words, strobes, beats, errors, math helpers).
pub mod common;
/// Converter configuration (defaults, sections, validated geometry).
pub mod config;
/// Transfer state machine and its signal bundles.
pub mod controller;
/// Width-conversion datapaths and their building blocks.
pub mod datapath;
/// Consumer models and the top-level simulator.
pub mod sim;
/// Source store trait, memory store, and read port.
pub mod source;
/// Transfer statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Converter control unit; build with `TransferController::new(config.validate()?)`.
pub use crate::controller::TransferController;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
