//! # Simulator Tests
//!
//! Whole-transfer requests, statistics accounting, cycle recording, and the
//! addressing contract with the source store.

use memstream_core::common::{ConfigError, RequestError};
use memstream_core::config::Config;
use memstream_core::controller::{ControllerState, TransferRequest};
use memstream_core::sim::{ReadyPattern, Simulator};
use memstream_core::source::MemoryStore;
use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, expected_payload};
use crate::common::mocks::store::expect_each_address_once;

// ══════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════

#[test]
fn test_store_width_must_match_source_width() {
    let err = Simulator::new(
        &Config::for_widths(32, 8),
        Box::new(MemoryStore::counting(64, 8)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::SourceWidthMismatch {
            store: 8,
            configured: 4
        }
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let err = Simulator::new(
        &Config::for_widths(24, 8),
        Box::new(MemoryStore::counting(64, 3)),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::RatioNotPowerOfTwo { .. }));
}

// ══════════════════════════════════════════════════════════
// Requests
// ══════════════════════════════════════════════════════════

#[test]
fn test_burst_too_long() {
    let mut ctx = TestContext::new(32, 32);
    let err = ctx.sim.run_transfer(4097, &ReadyPattern::Always).unwrap_err();
    assert_eq!(
        err,
        RequestError::BurstTooLong {
            requested: 4097,
            max: 4096
        }
    );
}

#[test]
fn test_busy_controller_refuses_transfer() {
    let mut ctx = TestContext::new(32, 32);
    let _ = ctx.sim.tick(TransferRequest::start(64), false, false);
    let err = ctx.sim.run_transfer(8, &ReadyPattern::Always).unwrap_err();
    assert_eq!(
        err,
        RequestError::Busy {
            state: ControllerState::Start
        }
    );
}

#[test]
fn test_never_ready_times_out() {
    let mut config = Config::for_widths(32, 32);
    config.general.max_cycles = 50;
    let mut ctx = TestContext::with_config(config);
    let err = ctx.sim.run_transfer(16, &ReadyPattern::Never).unwrap_err();
    assert_eq!(err, RequestError::Timeout { cycles: 50 });
    assert!(ctx.sim.controller().state().is_busy());
}

#[test]
fn test_max_burst_transfer() {
    let mut ctx = TestContext::new(64, 512);
    let outcome = ctx.run(4096, &ReadyPattern::Always);
    assert_eq!(outcome.payload(), expected_payload(4096));
    assert_eq!(outcome.beats.len(), 64);
}

// ══════════════════════════════════════════════════════════
// Statistics and tracing
// ══════════════════════════════════════════════════════════

#[test]
fn test_stats_account_for_transfer() {
    let mut ctx = TestContext::new(32, 8);
    let outcome = ctx.run(10, &ReadyPattern::Every(2));
    let stats = ctx.sim.stats();

    assert_eq!(stats.fetches, 3);
    assert_eq!(stats.beats, 10);
    assert_eq!(stats.bytes_delivered, 10);
    assert_eq!(stats.stall_cycles, outcome.stall_cycles);
    assert_eq!(stats.transfers_completed, 1);
    assert_eq!(stats.transfers_aborted, 0);
    assert_eq!(stats.cycles, outcome.cycles + 1);
    assert!(stats.beat_rate() > 0.0 && stats.beat_rate() <= 1.0);
}

#[test]
fn test_history_recorded_when_tracing() {
    let mut config = Config::for_widths(32, 32);
    config.general.trace_transfers = true;
    let mut ctx = TestContext::with_config(config);
    let outcome = ctx.run(8, &ReadyPattern::Always);

    let history = ctx.sim.history();
    assert_eq!(history.len() as u64, outcome.cycles + 1);
    assert_eq!(history[0].state, ControllerState::Idle);
    assert!(history.iter().any(|t| t.ack));
    assert!(history.iter().any(|t| t.to_string().contains("ACK")));
}

#[test]
fn test_history_empty_without_tracing() {
    let mut ctx = TestContext::new(32, 32);
    let _ = ctx.run(8, &ReadyPattern::Always);
    assert!(ctx.sim.history().is_empty());
}

// ══════════════════════════════════════════════════════════
// Source addressing
// ══════════════════════════════════════════════════════════

#[test]
fn test_each_address_fetched_exactly_once() {
    for (src, dst, total) in [(32, 32, 40u64), (8, 32, 13), (64, 16, 30)] {
        let src_bytes = (src / 8) as usize;
        let words = total.div_ceil(src_bytes as u64);
        let store = expect_each_address_once(src_bytes, words);
        let mut sim = Simulator::new(&Config::for_widths(src, dst), Box::new(store)).unwrap();

        let outcome = sim.run_transfer(total, &ReadyPattern::Every(2)).unwrap();
        assert_eq!(outcome.acks, 1);
        assert_eq!(sim.stats().fetches, words);
        // Dropping the simulator verifies the mock's call counts.
    }
}
