//! Common types shared by every part of the converter model.
//!
//! This module provides the fundamental building blocks used across the
//! datapath, controller, and simulator. It includes:
//! 1. **Words:** Little-endian byte-vector words and per-byte strobes.
//! 2. **Beats:** The data + strobe pair carried by one stream handshake.
//! 3. **Math:** Compile-time friendly `clog2` and power-of-two helpers.
//! 4. **Error Handling:** Configuration and request error types.

/// Error types for configuration, requests, and consumer patterns.
pub mod error;

/// Integer helpers (ceiling log2, bit masks).
pub mod math;

/// Word, strobe, and output beat types.
pub mod word;

pub use error::{ConfigError, PatternError, RequestError, WordSide};
pub use math::clog2;
pub use word::{OutputBeat, Strobe, Word};
