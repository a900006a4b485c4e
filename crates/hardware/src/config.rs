//! Configuration system for the width converter.
//!
//! This module defines the structures used to parameterize the converter. It provides:
//! 1. **Defaults:** Baseline widths, buffer depth, burst length, and cycle budget.
//! 2. **Structures:** Datapath, control, and general sections deserialized from JSON.
//! 3. **Validation:** [`Config::validate`] turns a raw configuration into a [`Geometry`],
//!    the only input a controller can be built from.
//!
//! Every parameter is fixed once a controller exists; there is no runtime reconfiguration.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, WordSide};
use crate::common::math::{clog2, low_mask};
use crate::common::word::Strobe;
use crate::datapath::Strategy;

/// Default configuration constants.
mod defaults {
    /// Source word width in bits.
    pub const SRC_WIDTH_BITS: u32 = 32;

    /// Output word width in bits.
    pub const DST_WIDTH_BITS: u32 = 32;

    /// Decouple buffer depth in entries (one slot is always kept free).
    pub const BUFFER_DEPTH: usize = 4;

    /// Largest transfer the control field must be able to express, in bytes.
    pub const MAX_BURST_LEN: u64 = 4096;

    /// Cycle budget for a single simulated transfer before it is declared hung.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Widest word either side may be configured with.
///
/// Bounded by the strobe, which carries one bit per byte lane.
pub const MAX_WORD_BITS: u32 = (Strobe::MAX_LANES * 8) as u32;

/// How the controller treats an enable pulse carrying a zero byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ZeroLength {
    /// Acknowledge immediately with a one-cycle ack and emit no beats.
    #[default]
    Ack,
    /// Ignore the request entirely; no transfer starts and no ack is raised.
    Ignore,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use memstream_core::config::{Config, ZeroLength};
///
/// let json = r#"{
///     "datapath": { "src_width_bits": 8, "dst_width_bits": 32 },
///     "control": { "max_burst_len": 256, "zero_length": "Ignore" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.datapath.buffer_depth, 4);
/// assert_eq!(config.control.zero_length, ZeroLength::Ignore);
///
/// let geometry = config.validate().unwrap();
/// assert_eq!(geometry.ratio(), 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Word widths and buffering
    #[serde(default)]
    pub datapath: DatapathConfig,
    /// Control-plane parameters
    #[serde(default)]
    pub control: ControlConfig,
    /// Simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Configuration for a given pair of widths with every other field at its default.
    pub fn for_widths(src_width_bits: u32, dst_width_bits: u32) -> Self {
        Self {
            datapath: DatapathConfig {
                src_width_bits,
                dst_width_bits,
                ..DatapathConfig::default()
            },
            ..Self::default()
        }
    }

    /// Sets the decouple buffer depth.
    #[must_use]
    pub const fn with_buffer_depth(mut self, depth: usize) -> Self {
        self.datapath.buffer_depth = depth;
        self
    }

    /// Sets the maximum burst length in bytes.
    #[must_use]
    pub const fn with_max_burst_len(mut self, len: u64) -> Self {
        self.control.max_burst_len = len;
        self
    }

    /// Sets the zero-length request policy.
    #[must_use]
    pub const fn with_zero_length(mut self, policy: ZeroLength) -> Self {
        self.control.zero_length = policy;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every parameter and derives the converter geometry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: widths that are zero, not whole
    /// bytes, or wider than [`MAX_WORD_BITS`]; a width ratio that is not a power
    /// of two; a buffer depth that is not a power of two of at least 2; or a zero
    /// burst length.
    pub fn validate(&self) -> Result<Geometry, ConfigError> {
        let src_bits = self.datapath.src_width_bits;
        let dst_bits = self.datapath.dst_width_bits;
        check_width(WordSide::Source, src_bits)?;
        check_width(WordSide::Output, dst_bits)?;

        let src_bytes = (src_bits / 8) as usize;
        let dst_bytes = (dst_bits / 8) as usize;
        let strategy = Strategy::select(src_bytes, dst_bytes)
            .ok_or(ConfigError::RatioNotPowerOfTwo { src_bits, dst_bits })?;

        let depth = self.datapath.buffer_depth;
        if depth < 2 || !depth.is_power_of_two() {
            return Err(ConfigError::BufferDepth(depth));
        }

        let max_burst_len = self.control.max_burst_len;
        if max_burst_len == 0 {
            return Err(ConfigError::ZeroBurst);
        }

        Ok(Geometry {
            src_bytes,
            dst_bytes,
            strategy,
            buffer_depth: depth,
            max_burst_len,
            len_field_bits: clog2(max_burst_len.saturating_add(1)),
            zero_length: self.control.zero_length,
        })
    }
}

fn check_width(side: WordSide, bits: u32) -> Result<(), ConfigError> {
    if bits == 0 || bits % 8 != 0 {
        return Err(ConfigError::WidthNotByteMultiple { side, bits });
    }
    if bits > MAX_WORD_BITS {
        return Err(ConfigError::WidthTooWide {
            side,
            bits,
            max: MAX_WORD_BITS,
        });
    }
    Ok(())
}

/// Word widths and inter-stage buffering.
#[derive(Debug, Clone, Deserialize)]
pub struct DatapathConfig {
    /// Source word width in bits
    #[serde(default = "DatapathConfig::default_src_width_bits")]
    pub src_width_bits: u32,

    /// Output stream word width in bits
    #[serde(default = "DatapathConfig::default_dst_width_bits")]
    pub dst_width_bits: u32,

    /// Decouple buffer depth (equal-width datapath only; must be a power of two)
    #[serde(default = "DatapathConfig::default_buffer_depth")]
    pub buffer_depth: usize,
}

impl DatapathConfig {
    fn default_src_width_bits() -> u32 {
        defaults::SRC_WIDTH_BITS
    }

    fn default_dst_width_bits() -> u32 {
        defaults::DST_WIDTH_BITS
    }

    fn default_buffer_depth() -> usize {
        defaults::BUFFER_DEPTH
    }
}

impl Default for DatapathConfig {
    fn default() -> Self {
        Self {
            src_width_bits: defaults::SRC_WIDTH_BITS,
            dst_width_bits: defaults::DST_WIDTH_BITS,
            buffer_depth: defaults::BUFFER_DEPTH,
        }
    }
}

/// Control-plane parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// Largest transfer in bytes; sizes the requested-length field
    #[serde(default = "ControlConfig::default_max_burst_len")]
    pub max_burst_len: u64,

    /// Handling of enable pulses that request zero bytes
    #[serde(default)]
    pub zero_length: ZeroLength,
}

impl ControlConfig {
    fn default_max_burst_len() -> u64 {
        defaults::MAX_BURST_LEN
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_burst_len: defaults::MAX_BURST_LEN,
            zero_length: ZeroLength::default(),
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log every fetch and accepted beat at `trace` level
    #[serde(default)]
    pub trace_transfers: bool,

    /// Cycle budget for one transfer before the simulator reports a timeout
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_transfers: false,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Validated, derived converter parameters.
///
/// Produced only by [`Config::validate`], so every holder can rely on the
/// width ratio being a power of two and the buffer depth being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    src_bytes: usize,
    dst_bytes: usize,
    strategy: Strategy,
    buffer_depth: usize,
    max_burst_len: u64,
    len_field_bits: u32,
    zero_length: ZeroLength,
}

impl Geometry {
    /// Source word size in bytes.
    #[inline]
    pub const fn src_bytes(&self) -> usize {
        self.src_bytes
    }

    /// Output word size in bytes (also the number of strobe lanes).
    #[inline]
    pub const fn dst_bytes(&self) -> usize {
        self.dst_bytes
    }

    /// Selected datapath strategy.
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Width ratio between the wider and narrower side (1 when equal).
    #[inline]
    pub const fn ratio(&self) -> usize {
        self.strategy.ratio()
    }

    /// Decouple buffer depth in entries.
    #[inline]
    pub const fn buffer_depth(&self) -> usize {
        self.buffer_depth
    }

    /// Width of the decouple buffer's start/end cursors.
    #[inline]
    pub const fn buffer_index_bits(&self) -> u32 {
        clog2(self.buffer_depth as u64)
    }

    /// Largest transfer in bytes.
    #[inline]
    pub const fn max_burst_len(&self) -> u64 {
        self.max_burst_len
    }

    /// Width of the requested-length control field.
    #[inline]
    pub const fn len_field_bits(&self) -> u32 {
        self.len_field_bits
    }

    /// Mask applied to the requested length as it crosses the control field.
    #[inline]
    pub const fn len_field_mask(&self) -> u64 {
        low_mask(self.len_field_bits)
    }

    /// Zero-length request policy.
    #[inline]
    pub const fn zero_length(&self) -> ZeroLength {
        self.zero_length
    }

    /// Number of source words a transfer of `total_bytes` fetches.
    #[inline]
    pub const fn words_for(&self, total_bytes: u64) -> u64 {
        total_bytes.div_ceil(self.src_bytes as u64)
    }

    /// Number of beats a transfer of `total_bytes` emits.
    #[inline]
    pub const fn beats_for(&self, total_bytes: u64) -> u64 {
        total_bytes.div_ceil(self.dst_bytes as u64)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "strategy          {}", self.strategy)?;
        writeln!(f, "source word       {} bytes", self.src_bytes)?;
        writeln!(f, "output word       {} bytes", self.dst_bytes)?;
        writeln!(
            f,
            "decouple buffer   {} entries ({} usable, {}-bit index)",
            self.buffer_depth,
            self.buffer_depth - 1,
            self.buffer_index_bits()
        )?;
        writeln!(
            f,
            "max burst         {} bytes ({}-bit length field)",
            self.max_burst_len, self.len_field_bits
        )?;
        write!(f, "zero-length       {:?}", self.zero_length)
    }
}
