//! # Transfer Properties
//!
//! Randomized transfers over every width ratio, buffer depth, and consumer
//! behavior, checking the invariants that must hold for all of them.

use memstream_core::config::Config;
use memstream_core::sim::ReadyPattern;
use proptest::prelude::*;

use crate::common::harness::{TestContext, accepted_beats, expected_payload};

const WIDTHS: &[(u32, u32)] = &[
    (8, 8),
    (32, 32),
    (64, 64),
    (8, 16),
    (8, 64),
    (32, 128),
    (16, 8),
    (64, 8),
    (256, 32),
];

fn ready_script() -> impl Strategy<Value = ReadyPattern> {
    prop::collection::vec(any::<bool>(), 1..8).prop_map(|mut seq| {
        seq[0] = true;
        ReadyPattern::Script(seq)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_transfer_invariants(
        widths in prop::sample::select(WIDTHS),
        depth in prop::sample::select(&[2usize, 4, 8, 16][..]),
        total in 1u64..300,
        pattern in ready_script(),
    ) {
        let (src, dst) = widths;
        let config = Config::for_widths(src, dst).with_buffer_depth(depth);
        let mut ctx = TestContext::with_config(config);
        let traces = ctx.drive(total, &pattern, 20_000);
        let beats = accepted_beats(&traces);

        // Every requested byte exactly once, in order.
        let payload: Vec<u8> = beats
            .iter()
            .flat_map(|b| b.valid_bytes().collect::<Vec<_>>())
            .collect();
        prop_assert_eq!(payload, expected_payload(total));
        let strobed: usize = beats.iter().map(|b| b.strobe.count()).sum();
        prop_assert_eq!(strobed as u64, total);

        // Only the final beat may be partial, and its strobe is a prefix.
        let (last, body) = beats.split_last().unwrap();
        prop_assert!(body.iter().all(|b| b.strobe.is_full()));
        prop_assert!(last.strobe.is_prefix());
        prop_assert!(last.strobe.count() > 0);

        // Exactly one single-cycle ack.
        let acks: Vec<usize> = traces
            .iter()
            .enumerate()
            .filter(|(_, t)| t.ack)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(acks.len(), 1);

        // Stable until accepted.
        for pair in traces.windows(2) {
            if pair[0].beat.is_some() && !pair[0].accepted {
                prop_assert_eq!(&pair[0].beat, &pair[1].beat);
            }
        }

        // The decouple ring keeps its reserved slot.
        if src == dst {
            prop_assert!(ctx.sim.stats().buffer_high_water < depth);
        }
    }

    #[test]
    fn prop_reset_then_clean_transfer(
        widths in prop::sample::select(WIDTHS),
        reset_after in 1u64..40,
        total in 1u64..120,
    ) {
        let (src, dst) = widths;
        let mut ctx = TestContext::new(src, dst);
        let _ = ctx.sim.tick(memstream_core::controller::TransferRequest::start(4000), true, false);
        for _ in 0..reset_after {
            prop_assert!(!ctx.idle(reset_after % 2 == 0).ack);
        }
        let after_reset = ctx.sim.reset();
        prop_assert!(!after_reset.ack);
        prop_assert_eq!(ctx.sim.controller().buffer_occupancy(), 0);
        prop_assert_eq!(ctx.sim.controller().address(), 0);

        let outcome = ctx.run(total, &ReadyPattern::Always);
        prop_assert_eq!(outcome.payload(), expected_payload(total));
        prop_assert_eq!(outcome.acks, 1);
    }
}
