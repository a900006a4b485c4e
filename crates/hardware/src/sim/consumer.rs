//! Downstream consumer models.
//!
//! A `ReadyPattern` decides, cycle by cycle, whether the consumer asserts
//! `ready`. Patterns parse from short textual forms for the command line:
//! `always`, `never`, `every:N`, `stall:AFTER:CYCLES`, `script:1101`.

use std::str::FromStr;

use crate::common::error::PatternError;

/// Consumer `ready` behavior over time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReadyPattern {
    /// Ready on every cycle.
    #[default]
    Always,
    /// Never ready.
    Never,
    /// Ready on one cycle out of every `n`, starting with the first.
    Every(u64),
    /// Ready except for `for_cycles` cycles beginning at cycle `after`.
    Stall {
        /// First stalled cycle.
        after: u64,
        /// Number of stalled cycles.
        for_cycles: u64,
    },
    /// Explicit sequence, repeated once exhausted.
    Script(Vec<bool>),
}

impl ReadyPattern {
    /// `ready` on `cycle`, counted from the start of the transfer.
    pub fn is_ready(&self, cycle: u64) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Every(n) => *n <= 1 || cycle % n == 0,
            Self::Stall { after, for_cycles } => {
                cycle < *after || cycle - after >= *for_cycles
            }
            Self::Script(seq) => {
                if seq.is_empty() {
                    return true;
                }
                let len = seq.len() as u64;
                let idx = (cycle % len) as usize;
                seq[idx]
            }
        }
    }
}

impl FromStr for ReadyPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| PatternError {
            input: s.to_string(),
            reason,
        };
        let lower = s.trim().to_ascii_lowercase();
        let mut parts = lower.split(':');
        let kind = parts.next().unwrap_or_default();
        let mut number = || -> Result<u64, PatternError> {
            parts
                .next()
                .ok_or_else(|| err("missing number"))?
                .parse::<u64>()
                .map_err(|_| err("expected an unsigned integer"))
        };

        match kind {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "every" => {
                let n = number()?;
                if n == 0 {
                    return Err(err("period must be at least 1"));
                }
                Ok(Self::Every(n))
            }
            "stall" => {
                let after = number()?;
                let for_cycles = number()?;
                Ok(Self::Stall { after, for_cycles })
            }
            "script" => {
                let body = lower.strip_prefix("script:").unwrap_or_default();
                body.chars()
                    .map(|c| match c {
                        '1' => Ok(true),
                        '0' => Ok(false),
                        _ => Err(err("script may only contain 0 and 1")),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Script)
            }
            _ => Err(err("unknown pattern")),
        }
    }
}
