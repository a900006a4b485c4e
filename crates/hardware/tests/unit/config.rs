//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON and file loading, and validation
//! into a converter geometry.

use std::io::Write;

use memstream_core::common::{ConfigError, WordSide};
use memstream_core::config::*;
use memstream_core::datapath::Strategy;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.datapath.src_width_bits, 32);
    assert_eq!(config.datapath.dst_width_bits, 32);
    assert_eq!(config.datapath.buffer_depth, 4);
    assert_eq!(config.control.max_burst_len, 4096);
    assert_eq!(config.control.zero_length, ZeroLength::Ack);
    assert!(!config.general.trace_transfers);
    assert_eq!(config.general.max_cycles, 1_000_000);
}

#[test]
fn test_default_geometry() {
    let geometry = Config::default().validate().unwrap();
    assert_eq!(geometry.strategy(), Strategy::Equal);
    assert_eq!(geometry.src_bytes(), 4);
    assert_eq!(geometry.dst_bytes(), 4);
    assert_eq!(geometry.buffer_depth(), 4);
    assert_eq!(geometry.buffer_index_bits(), 2);
    assert_eq!(geometry.len_field_bits(), 13);
    assert_eq!(geometry.len_field_mask(), 0x1FFF);
}

// ══════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════

#[test]
fn test_from_json_partial_sections() {
    let config = Config::from_json(
        r#"{ "datapath": { "src_width_bits": 8, "dst_width_bits": 64 },
             "control": { "zero_length": "Ignore" } }"#,
    )
    .unwrap();
    assert_eq!(config.datapath.src_width_bits, 8);
    assert_eq!(config.datapath.dst_width_bits, 64);
    assert_eq!(config.datapath.buffer_depth, 4);
    assert_eq!(config.control.zero_length, ZeroLength::Ignore);
    assert_eq!(config.control.max_burst_len, 4096);

    let geometry = config.validate().unwrap();
    assert_eq!(geometry.strategy(), Strategy::Upsize { ratio: 8 });
}

#[test]
fn test_from_json_empty_object_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.validate().unwrap(), Config::default().validate().unwrap());
}

#[test]
fn test_from_json_rejects_malformed() {
    let err = Config::from_json("{ datapath: }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{ "datapath": {{ "src_width_bits": 128, "dst_width_bits": 32, "buffer_depth": 8 }} }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let geometry = config.validate().unwrap();
    assert_eq!(geometry.strategy(), Strategy::Downsize { ratio: 4 });
    assert_eq!(geometry.buffer_depth(), 8);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(8, 8, Strategy::Equal)]
#[case(8, 32, Strategy::Upsize { ratio: 4 })]
#[case(16, 512, Strategy::Upsize { ratio: 32 })]
#[case(64, 8, Strategy::Downsize { ratio: 8 })]
#[case(512, 256, Strategy::Downsize { ratio: 2 })]
fn test_strategy_from_widths(#[case] src: u32, #[case] dst: u32, #[case] expected: Strategy) {
    let geometry = Config::for_widths(src, dst).validate().unwrap();
    assert_eq!(geometry.strategy(), expected);
    assert_eq!(geometry.ratio(), expected.ratio());
}

#[rstest]
#[case(24, 64)]
#[case(32, 96)]
#[case(64, 24)]
fn test_non_power_of_two_ratio_rejected(#[case] src: u32, #[case] dst: u32) {
    let err = Config::for_widths(src, dst).validate().unwrap_err();
    assert!(matches!(err, ConfigError::RatioNotPowerOfTwo { .. }), "{err}");
}

#[test]
fn test_width_not_byte_multiple() {
    let err = Config::for_widths(12, 32).validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::WidthNotByteMultiple {
            side: WordSide::Source,
            bits: 12
        }
    ));

    let err = Config::for_widths(32, 0).validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::WidthNotByteMultiple {
            side: WordSide::Output,
            ..
        }
    ));
}

#[test]
fn test_width_too_wide() {
    let err = Config::for_widths(1024, 512).validate().unwrap_err();
    assert!(matches!(err, ConfigError::WidthTooWide { bits: 1024, .. }));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(12)]
fn test_bad_buffer_depth(#[case] depth: usize) {
    let err = Config::default()
        .with_buffer_depth(depth)
        .validate()
        .unwrap_err();
    assert!(matches!(err, ConfigError::BufferDepth(d) if d == depth));
}

#[test]
fn test_zero_burst_rejected() {
    let err = Config::default()
        .with_max_burst_len(0)
        .validate()
        .unwrap_err();
    assert!(matches!(err, ConfigError::ZeroBurst));
}

#[rstest]
#[case(1, 1)]
#[case(15, 4)]
#[case(16, 5)]
#[case(4096, 13)]
fn test_length_field_width(#[case] max: u64, #[case] bits: u32) {
    let geometry = Config::default()
        .with_max_burst_len(max)
        .validate()
        .unwrap();
    assert_eq!(geometry.len_field_bits(), bits);
}

#[test]
fn test_geometry_word_and_beat_counts() {
    let geometry = Config::for_widths(32, 8).validate().unwrap();
    assert_eq!(geometry.words_for(6), 2);
    assert_eq!(geometry.beats_for(6), 6);

    let geometry = Config::for_widths(8, 32).validate().unwrap();
    assert_eq!(geometry.words_for(6), 6);
    assert_eq!(geometry.beats_for(6), 2);
}

#[test]
fn test_geometry_report_mentions_strategy() {
    let geometry = Config::for_widths(8, 32).validate().unwrap();
    let report = geometry.to_string();
    assert!(report.contains("upsize x4"), "{report}");
}
