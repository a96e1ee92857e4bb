//! Bang-bang water level regulation.
//!
//! Pumps are driven in discrete steps: "open `k` pumps" closes every pump
//! and then switches on the first `k` pump slots in index order, skipping
//! broken ones.  Skipped slots still count towards `k`, so `k` is an upper
//! bound on running pumps, not a guarantee.
//!
//! Every decision is recomputed from the current snapshot each tick; there
//! is no memory beyond the pump flags themselves.

use log::debug;

use crate::app::commands::OutboundMessage;
use crate::fsm::context::{ControllerState, TickOutput};

/// Tick-length-normalised fill divisor used when sizing the initial fill.
pub const FILL_CONSTANT: f64 = 15.0;

/// Switch every pump off, emitting CLOSE_PUMP for each.
pub fn close_all_pumps(state: &mut ControllerState, out: &mut TickOutput) {
    for (index, pump) in state.pumps.iter_mut().enumerate() {
        pump.switch_off();
        out.send(OutboundMessage::ClosePump(index));
    }
}

/// Close all pumps, then open the first `count` non-broken slots.
pub fn open_pumps(state: &mut ControllerState, count: usize, out: &mut TickOutput) {
    close_all_pumps(state, out);
    for (index, pump) in state.pumps.iter_mut().enumerate().take(count) {
        if pump.switch_on() {
            out.send(OutboundMessage::OpenPump(index));
        }
    }
}

/// Keep the level inside (N1, N2).  Used by NORMAL and DEGRADED.
///
/// Priority order:
/// 1. above N2: one pump
/// 2. below N1: every pump
/// 3. above the band midpoint: one pump fewer than currently running
/// 4. below the band midpoint: one pump more
///
/// Exactly at the midpoint nothing changes.
pub fn maintain_water_level(state: &mut ControllerState, out: &mut TickOutput) {
    let level = state.readings.water_level;
    let limits = state.limits;
    let running = state.opened_pumps();

    let target = if level > limits.n2 {
        1
    } else if level < limits.n1 {
        state.pump_count()
    } else if level > limits.band_midpoint() {
        running.saturating_sub(1)
    } else if level < limits.band_midpoint() {
        (running + 1).min(state.pump_count())
    } else {
        debug!("level {level:.1} at band midpoint, holding {running} pump(s)");
        return;
    };

    debug!("level {level:.1}: {running} -> {target} pump(s)");
    open_pumps(state, target, out);
}

/// Pump count for the initial fill from `level`:
/// `floor(min(((M1 + N2/2) - level) / (FILL_CONSTANT * capacity[0]), pumps))`.
pub fn initial_fill_pump_count(state: &ControllerState) -> usize {
    let limits = &state.limits;
    let per_pump = state.pumps.first().map_or(0.0, |p| p.capacity());
    let needed = (limits.m1 + limits.n2 / 2.0) - state.readings.water_level;
    let pumps = state.pump_count() as f64;

    // Zero capacity yields +inf (or NaN for 0/0); `min` resolves both to the
    // pump count.
    let count = (needed / (FILL_CONSTANT * per_pump)).min(pumps);
    count.clamp(0.0, pumps).floor() as usize
}

/// Fill or drain towards the normal band while the boiler waits to start.
pub fn adjust_initial_level(state: &mut ControllerState, out: &mut TickOutput) {
    let level = state.readings.water_level;
    let limits = state.limits;

    if level < limits.n1 {
        if state.valve_open {
            // Drained past the band; stop evacuating before filling.
            out.send(OutboundMessage::Valve);
            state.valve_open = false;
        }
        let count = initial_fill_pump_count(state);
        debug!("initial fill: level {level:.1} < N1, opening {count} pump(s)");
        open_pumps(state, count, out);
    } else if level >= limits.n2 {
        if !state.valve_open {
            debug!("initial drain: level {level:.1} >= N2, opening valve");
            out.send(OutboundMessage::Valve);
            state.valve_open = true;
        }
    } else if level == limits.n1 {
        open_pumps(state, 1, out);
    }
}
