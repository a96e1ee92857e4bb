//! Table-driven mode dispatcher.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ModeTable                                               │
//! │  ┌────────────────┬──────────────────┬────────────────┐  │
//! │  │ Mode           │ name             │ on_update      │  │
//! │  ├────────────────┼──────────────────┼────────────────┤  │
//! │  │ Initialisation │ "Initialisation" │ fn(st, out)    │  │
//! │  │ Normal         │ "Normal"         │ fn(st, out)    │  │
//! │  │ Degraded       │ "Degraded"       │ fn(st, out)    │  │
//! │  │ Rescue         │ "Rescue"         │ fn(st, out)    │  │
//! │  │ EmergencyStop  │ "EmergencyStop"  │ fn(st, out)    │  │
//! │  └────────────────┴──────────────────┴────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the dispatcher runs exactly one handler, the one for the
//! controller's **current** mode.  Handlers never assign the mode
//! themselves: they *request* transitions through [`TickOutput`], and the
//! highest-precedence request of the tick wins.  The dispatcher then
//! commits it.

pub mod context;
pub mod states;

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use context::{ControllerState, TickOutput};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Top-level operating mode.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    Initialisation = 0,
    Normal = 1,
    Degraded = 2,
    Rescue = 3,
    EmergencyStop = 4,
}

impl Mode {
    /// Total number of modes; sizes the table array.
    pub const COUNT: usize = 5;

    pub const ALL: [Mode; Mode::COUNT] = [
        Mode::Initialisation,
        Mode::Normal,
        Mode::Degraded,
        Mode::Rescue,
        Mode::EmergencyStop,
    ];

    /// Once entered, only an external operator can leave it.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EmergencyStop)
    }

    /// Rank of a mode request within one tick.  A request only replaces an
    /// earlier one of strictly lower rank.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Initialisation | Self::Normal => 0,
            Self::Degraded => 1,
            Self::Rescue => 2,
            Self::EmergencyStop => 3,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialisation => "INITIALISATION",
            Self::Normal => "NORMAL",
            Self::Degraded => "DEGRADED",
            Self::Rescue => "RESCUE",
            Self::EmergencyStop => "EMERGENCY_STOP",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Handler type and table row
// ---------------------------------------------------------------------------

/// Per-tick mode handler.  Reads the snapshot, may mutate pumps and the
/// valve latch, emits messages and requests transitions through `out`.
pub type ModeUpdateFn = fn(&mut ControllerState, &mut TickOutput);

/// Static descriptor for a single mode.
#[derive(Clone, Copy)]
pub struct ModeDescriptor {
    pub mode: Mode,
    pub name: &'static str,
    pub on_update: ModeUpdateFn,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Owns the mode table and per-mode timing.  The mode itself lives in
/// [`ControllerState`] because inbound MODE messages overwrite it too.
#[derive(Clone)]
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [ModeDescriptor; Mode::COUNT],
    /// Mode seen by the previous dispatch.
    last_mode: Mode,
    tick_count: u64,
    /// Tick at which the current mode was entered.
    mode_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [ModeDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            last_mode: initial,
            tick_count: 0,
            mode_entry_tick: 0,
        }
    }

    /// Run the handler for the current mode, then commit the winning
    /// transition request (if any).
    pub fn dispatch(&mut self, state: &mut ControllerState, out: &mut TickOutput) {
        self.tick_count += 1;

        // Inbound MODE messages may have moved us since the last dispatch.
        if state.mode != self.last_mode {
            self.enter(self.last_mode, state.mode);
        }

        let descriptor = &self.table[state.mode as usize];
        debug_assert_eq!(descriptor.mode, state.mode);
        (descriptor.on_update)(state, out);
        out.settle();

        if let Some(next) = out.requested_mode() {
            if state.mode.is_terminal() && next != state.mode {
                // Only an inbound MODE message leaves a terminal mode.
                warn!(
                    "{} handler requested {}, staying put",
                    self.name_of(state.mode),
                    self.name_of(next)
                );
            } else {
                if next != state.mode {
                    self.enter(state.mode, next);
                }
                state.mode = next;
            }
        }
        self.last_mode = state.mode;
    }

    /// Name of `mode` as registered in the table.
    pub fn name_of(&self, mode: Mode) -> &'static str {
        self.table[mode as usize].name
    }

    /// Total dispatches since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// How many dispatches have run since the current mode was entered.
    pub fn ticks_in_current_mode(&self) -> u64 {
        self.tick_count - self.mode_entry_tick
    }

    fn enter(&mut self, from: Mode, to: Mode) {
        info!("mode transition: {} -> {}", self.name_of(from), self.name_of(to));
        self.mode_entry_tick = self.tick_count;
    }
}
