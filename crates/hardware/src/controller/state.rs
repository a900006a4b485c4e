//! Transfer controller states.

use std::fmt;

/// Phase of the transfer controller.
///
/// A transfer walks `Idle → Start → Delay → Read → Fin → Idle`. `Read` may
/// loop on itself, fall back to `Start` (equal width, buffer full) or to
/// `Delay` (downsizing, new source word).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Waiting for an enable pulse; counters are clear.
    #[default]
    Idle,
    /// Issuing the first fetch of a run.
    Start,
    /// Waiting one cycle for the fetched word to arrive.
    Delay,
    /// Steady-state fetching.
    Read,
    /// All fetches issued; draining the datapath before acknowledging.
    Fin,
}

impl ControllerState {
    /// True while a transfer is in progress.
    #[inline]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Start => "START",
            Self::Delay => "DELAY",
            Self::Read => "READ",
            Self::Fin => "FIN",
        };
        f.write_str(name)
    }
}
