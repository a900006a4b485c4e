//! Transfer Controller.
//!
//! The controller owns every counter of a transfer and the selected datapath.
//! It is clocked by [`TransferController::tick`], which models one synchronous
//! clock edge:
//! 1. **Compute:** The register file is cloned and every next-state value is
//!    written into the clone, reading only the current (pre-edge) state.
//! 2. **Commit:** The clone replaces the register file in one assignment.
//!
//! Outputs visible to the outside world (`stream`, `ack`, `address`) are pure
//! functions of the committed registers, so they are stable for the whole
//! cycle and a beat held under backpressure never changes.

/// Per-cycle input and output bundles.
pub mod signals;

/// Controller state enumeration.
pub mod state;

use tracing::{debug, info, trace, warn};

pub use self::signals::{SourceResponse, TickInputs, TickOutputs, TransferRequest};
pub use self::state::ControllerState;

use crate::common::word::OutputBeat;
use crate::config::{Geometry, ZeroLength};
use crate::datapath::{Datapath, Strategy, Transfer, WidthPath};

/// Register file of the controller.
#[derive(Clone, Debug)]
struct Registers {
    state: ControllerState,
    transfer: Transfer,
    /// Word index of the next fetch.
    address: u64,
    /// Bytes accounted for by issued fetches. Advances by one source word per
    /// fetch on every path, so upsizing counts per source word, not per beat.
    bytes: u64,
    /// Word index whose data is due from the source.
    in_flight: Option<u64>,
    ack: bool,
    /// `enable` as sampled on the previous edge.
    enable_seen: bool,
    path: Datapath,
}

impl Registers {
    fn new(geometry: &Geometry) -> Self {
        Self {
            state: ControllerState::Idle,
            transfer: Transfer::default(),
            address: 0,
            bytes: 0,
            in_flight: None,
            ack: false,
            enable_seen: false,
            path: Datapath::for_geometry(geometry),
        }
    }

    fn clear(&mut self) {
        self.state = ControllerState::Idle;
        self.transfer = Transfer::default();
        self.address = 0;
        self.bytes = 0;
        self.in_flight = None;
        self.ack = false;
        self.enable_seen = false;
        self.path.clear();
    }
}

/// Streaming width converter control unit.
#[derive(Clone, Debug)]
pub struct TransferController {
    geometry: Geometry,
    regs: Registers,
}

impl TransferController {
    /// Builds an idle controller for a validated geometry.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            regs: Registers::new(&geometry),
            geometry,
        }
    }

    /// Geometry the controller was built for.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Datapath strategy chosen at construction.
    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.regs.path.strategy()
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> ControllerState {
        self.regs.state
    }

    /// Output stream: `Some` while `valid` is high, carrying `data` and `strobe`.
    pub fn stream(&self) -> Option<OutputBeat> {
        self.regs.path.head()
    }

    /// One-cycle completion pulse.
    #[inline]
    pub const fn ack(&self) -> bool {
        self.regs.ack
    }

    /// Address counter: word index of the next fetch.
    #[inline]
    pub const fn address(&self) -> u64 {
        self.regs.address
    }

    /// Byte counter.
    #[inline]
    pub const fn bytes_accounted(&self) -> u64 {
        self.regs.bytes
    }

    /// Latched transfer (zeroed while idle after a reset).
    #[inline]
    pub const fn transfer(&self) -> Transfer {
        self.regs.transfer
    }

    /// Sub-word cursor of the assembler.
    pub fn cursor(&self) -> usize {
        self.regs.path.cursor()
    }

    /// Entries held in the datapath buffers.
    pub fn buffer_occupancy(&self) -> usize {
        self.regs.path.occupancy()
    }

    /// True while an issued fetch has not yet returned data.
    #[inline]
    pub const fn fetch_outstanding(&self) -> bool {
        self.regs.in_flight.is_some()
    }

    /// Read-only view of the datapath.
    #[inline]
    pub const fn datapath(&self) -> &Datapath {
        &self.regs.path
    }

    /// Advances the controller by one clock edge.
    pub fn tick(&mut self, inputs: &TickInputs) -> TickOutputs {
        if inputs.reset {
            if self.regs.state.is_busy() {
                warn!(
                    state = %self.regs.state,
                    bytes = self.regs.bytes,
                    total = self.regs.transfer.total_bytes,
                    "reset aborted transfer"
                );
            }
            self.regs.clear();
            return TickOutputs::default();
        }

        let cur = &self.regs;
        let mut next = cur.clone();
        next.ack = false;
        next.enable_seen = inputs.request.enable;

        // Output handshake.
        let head = cur.path.head();
        let stalled = head.is_some() && !inputs.ready;
        let accepted = if inputs.ready { head } else { None };
        let accepting = accepted.is_some();
        if let Some(beat) = &accepted {
            trace!(beat = %beat, "beat accepted");
            next.path.accept();
        }

        // Source data lands one cycle after its advance.
        let mut landing = false;
        if let (Some(index), Some(word)) = (cur.in_flight, inputs.source.data.as_ref()) {
            next.path.land(word.clone(), index);
            next.in_flight = None;
            landing = true;
        }

        let can_fetch =
            (cur.in_flight.is_none() || landing) && cur.path.has_room(landing, accepting);
        let mut advance = None;

        match cur.state {
            ControllerState::Idle => self.idle(&inputs.request, cur.enable_seen, &mut next),
            ControllerState::Start => {
                if can_fetch {
                    advance = Some(Self::fetch(&self.geometry, cur, &mut next));
                    next.state = if Self::complete(&next) {
                        ControllerState::Fin
                    } else {
                        ControllerState::Delay
                    };
                }
            }
            ControllerState::Delay => next.state = ControllerState::Read,
            ControllerState::Read => {
                if can_fetch {
                    advance = Some(Self::fetch(&self.geometry, cur, &mut next));
                    if Self::complete(&next) {
                        next.state = ControllerState::Fin;
                    } else if matches!(self.geometry.strategy(), Strategy::Downsize { .. }) {
                        next.state = ControllerState::Delay;
                    }
                } else if matches!(self.geometry.strategy(), Strategy::Equal) {
                    next.state = ControllerState::Start;
                }
            }
            ControllerState::Fin => {
                if next.in_flight.is_none() && next.path.is_drained() {
                    info!(
                        total = cur.transfer.total_bytes,
                        words = cur.transfer.words,
                        "transfer complete"
                    );
                    next.ack = true;
                    next.address = 0;
                    next.bytes = 0;
                    next.state = ControllerState::Idle;
                }
            }
        }

        if next.state != cur.state {
            debug!(from = %cur.state, to = %next.state, "state transition");
        }

        self.regs = next;
        TickOutputs {
            advance,
            accepted,
            stalled,
        }
    }

    /// Latches a new request, or answers a zero-length one.
    fn idle(&self, request: &TransferRequest, enable_seen: bool, next: &mut Registers) {
        if !request.enable {
            return;
        }
        let mask = self.geometry.len_field_mask();
        let total = request.total_bytes & mask;
        if total != request.total_bytes {
            warn!(
                requested = request.total_bytes,
                truncated = total,
                bits = self.geometry.len_field_bits(),
                "byte count truncated to length field"
            );
        }
        if total == 0 {
            // A level-held enable is answered once, on its rising edge.
            if self.geometry.zero_length() == ZeroLength::Ack && !enable_seen {
                debug!("zero-length request acknowledged");
                next.ack = true;
            }
            return;
        }

        let transfer = Transfer::new(total, &self.geometry);
        next.transfer = transfer;
        next.address = 0;
        next.bytes = 0;
        next.in_flight = None;
        next.path.begin(transfer);
        next.state = ControllerState::Start;
    }

    /// Issues one address advance and returns the fetched word index.
    fn fetch(geometry: &Geometry, cur: &Registers, next: &mut Registers) -> u64 {
        let index = cur.address;
        trace!(index, bytes = cur.bytes, "fetch");
        next.address = cur.address + 1;
        next.bytes = cur.bytes + geometry.src_bytes() as u64;
        next.in_flight = Some(index);
        index
    }

    const fn complete(regs: &Registers) -> bool {
        regs.bytes >= regs.transfer.total_bytes
    }
}
