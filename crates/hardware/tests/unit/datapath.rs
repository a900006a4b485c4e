//! # Datapath Tests
//!
//! Direct tests of the three width paths through the `WidthPath` interface,
//! independent of the controller's timing.

use memstream_core::common::Word;
use memstream_core::config::{Config, Geometry};
use memstream_core::datapath::{Datapath, Strategy, Transfer, WidthPath};
use pretty_assertions::assert_eq;

fn geometry(src_bits: u32, dst_bits: u32, depth: usize) -> Geometry {
    Config::for_widths(src_bits, dst_bits)
        .with_buffer_depth(depth)
        .validate()
        .unwrap()
}

fn word(bytes: &[u8]) -> Word {
    Word::from_bytes(bytes.to_vec())
}

// ══════════════════════════════════════════════════════════
// Dispatch
// ══════════════════════════════════════════════════════════

#[test]
fn test_datapath_variant_matches_geometry() {
    for (src, dst, strategy) in [
        (32, 32, Strategy::Equal),
        (8, 32, Strategy::Upsize { ratio: 4 }),
        (32, 8, Strategy::Downsize { ratio: 4 }),
    ] {
        let path = Datapath::for_geometry(&geometry(src, dst, 4));
        assert_eq!(path.strategy(), strategy);
        assert!(path.is_drained());
        assert!(path.head().is_none());
    }
}

// ══════════════════════════════════════════════════════════
// Equal width
// ══════════════════════════════════════════════════════════

#[test]
fn test_equal_batches_until_full() {
    let g = geometry(32, 32, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(32, &g));

    path.land(word(&[0, 1, 2, 3]), 0);
    path.land(word(&[4, 5, 6, 7]), 1);
    assert!(path.head().is_none(), "head hidden before the batch fills");
    assert!(!path.has_room(true, false), "near-full ring refuses a fetch while one lands");

    path.land(word(&[8, 9, 10, 11]), 2);
    assert_eq!(path.occupancy(), 3);
    assert!(!path.has_room(false, false));
    let head = path.head().unwrap();
    assert_eq!(head.data, word(&[0, 1, 2, 3]));
    assert!(head.strobe.is_full());

    path.accept();
    path.accept();
    assert_eq!(path.head().unwrap().data, word(&[8, 9, 10, 11]));
    path.accept();
    assert!(path.is_drained());
    assert!(path.head().is_none());
}

#[test]
fn test_equal_final_word_releases_partial_batch() {
    let g = geometry(32, 32, 8);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(6, &g));

    path.land(word(&[0, 1, 2, 3]), 0);
    assert!(path.head().is_none());
    path.land(word(&[4, 5, 6, 7]), 1);

    assert!(path.head().unwrap().strobe.is_full());
    path.accept();
    let tail = path.head().unwrap();
    assert_eq!(tail.strobe.bits(), 0b0011);
    assert_eq!(tail.valid_bytes().collect::<Vec<_>>(), vec![4, 5]);
}

// ══════════════════════════════════════════════════════════
// Upsizing
// ══════════════════════════════════════════════════════════

#[test]
fn test_upsize_first_word_in_low_lane() {
    let g = geometry(8, 32, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(8, &g));

    for (i, b) in [0xA0u8, 0xA1, 0xA2].into_iter().enumerate() {
        path.land(word(&[b]), i as u64);
        assert!(path.head().is_none());
        assert_eq!(path.cursor(), i + 1);
    }
    assert!(!path.has_room(true, false), "last lane is about to fill");
    path.land(word(&[0xA3]), 3);

    let beat = path.head().unwrap();
    assert_eq!(beat.data.low_u64(), 0xA3A2_A1A0);
    assert!(beat.strobe.is_full());
    assert_eq!(path.cursor(), 0);
}

#[test]
fn test_upsize_group_waits_for_output_register() {
    let g = geometry(8, 16, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(4, &g));

    path.land(word(&[1]), 0);
    path.land(word(&[2]), 1);
    path.land(word(&[3]), 2);
    path.land(word(&[4]), 3);

    assert_eq!(path.head().unwrap().data, word(&[1, 2]));
    assert!(!path.has_room(false, false), "sealed group blocks fetches");
    assert_eq!(path.occupancy(), 2);

    path.accept();
    assert_eq!(path.head().unwrap().data, word(&[3, 4]));
    path.accept();
    assert!(path.is_drained());
}

#[test]
fn test_upsize_partial_group_zero_filled_and_masked() {
    let g = geometry(8, 32, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(6, &g));

    for i in 0..6u8 {
        path.land(word(&[i + 1]), u64::from(i));
        if i == 3 {
            path.accept();
        }
    }
    let tail = path.head().unwrap();
    assert_eq!(tail.data, word(&[5, 6, 0, 0]));
    assert_eq!(tail.strobe.bits(), 0b0011);
}

// ══════════════════════════════════════════════════════════
// Downsizing
// ══════════════════════════════════════════════════════════

#[test]
fn test_downsize_slices_low_lane_first() {
    let g = geometry(32, 8, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(8, &g));

    assert!(path.has_room(false, false));
    path.land(word(&[1, 2, 3, 4]), 0);
    assert!(!path.has_room(false, false));

    let mut seen = Vec::new();
    for lane in 0..4 {
        assert_eq!(path.cursor(), lane);
        let last = lane == 3;
        assert_eq!(path.has_room(false, true), last, "fetch only on the last lane");
        seen.push(path.head().unwrap().data.low_u64());
        path.accept();
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert!(path.is_drained());
}

#[test]
fn test_downsize_stops_before_lanes_past_total() {
    let g = geometry(64, 16, 4);
    let mut path = Datapath::for_geometry(&g);
    path.begin(Transfer::new(5, &g));

    path.land(word(&[0, 1, 2, 3, 4, 5, 6, 7]), 0);
    let mut beats = Vec::new();
    while let Some(beat) = path.head() {
        beats.push(beat);
        path.accept();
    }
    assert_eq!(beats.len(), 3);
    assert!(beats[0].strobe.is_full());
    assert!(beats[1].strobe.is_full());
    assert_eq!(beats[2].strobe.bits(), 0b01);
    assert_eq!(beats[2].data, word(&[4, 5]));
}

#[test]
fn test_clear_empties_every_variant() {
    for (src, dst) in [(32, 32), (8, 32), (32, 8)] {
        let g = geometry(src, dst, 4);
        let mut path = Datapath::for_geometry(&g);
        path.begin(Transfer::new(64, &g));
        let width = g.src_bytes();
        path.land(Word::zeroed(width), 0);
        path.land(Word::zeroed(width), 1);
        path.clear();
        assert!(path.is_drained(), "{src}->{dst}");
        assert_eq!(path.occupancy(), 0);
        assert_eq!(path.cursor(), 0);
    }
}
