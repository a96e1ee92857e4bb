//! Boiler controller: the hexagonal core.
//!
//! [`BoilerController`] owns the mode dispatcher, the safety supervisor and
//! the controller state.  One call to [`BoilerController::tick`] is one
//! control cycle:
//!
//! ```text
//!  inbound batch ──▶ consume_messages ──▶ safety ──▶ mode handler ──▶ outbound batch
//! ```
//!
//! Nothing here blocks or performs I/O; [`BoilerController::clock`] wraps a
//! tick with a [`Transport`] exchange.

use log::{info, trace};

use crate::config::BoilerConfig;
use crate::error::{ProtocolError, Result};
use crate::fsm::context::{ControllerState, TickOutput};
use crate::fsm::states::build_mode_table;
use crate::fsm::{Fsm, Mode};
use crate::safety::SafetySupervisor;

use super::commands::OutboundMessage;
use super::events::InboundMessage;
use super::ports::Transport;
use super::telemetry::StatusReport;

/// The steam boiler controller.
#[derive(Clone)]
pub struct BoilerController {
    fsm: Fsm,
    state: ControllerState,
    safety: SafetySupervisor,
}

impl BoilerController {
    /// Construct a controller in INITIALISATION from validated
    /// characteristics.  The configuration is not retained.
    pub fn new(config: &BoilerConfig) -> Result<Self> {
        config.validate()?;
        let state = ControllerState::new(config);
        let safety = SafetySupervisor::new(state.limits);
        let fsm = Fsm::new(build_mode_table(), state.mode);

        info!(
            "controller ready: {} pump(s), M1={} N1={} N2={} M2={} capacity={}",
            state.pump_count(),
            state.limits.m1,
            state.limits.n1,
            state.limits.n2,
            state.limits.m2,
            state.limits.tank_capacity,
        );

        Ok(Self { fsm, state, safety })
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle over an inbound batch and return the outbound
    /// batch.
    ///
    /// A batch that violates the protocol is rejected before any of it is
    /// applied; the mode handler does not run for that tick.
    pub fn tick(&mut self, inbound: &[InboundMessage]) -> Result<Vec<OutboundMessage>> {
        self.consume_messages(inbound)?;
        Ok(self.run_mode_handler())
    }

    /// [`tick`](Self::tick) with the batch exchange done through `transport`.
    pub fn clock(&mut self, transport: &mut impl Transport) -> Result<()> {
        let inbound = transport.receive()?;
        let outbound = self.tick(&inbound)?;
        transport.send(&outbound)?;
        Ok(())
    }

    /// Apply an inbound batch to the snapshot, in order.
    pub fn consume_messages(
        &mut self,
        inbound: &[InboundMessage],
    ) -> core::result::Result<(), ProtocolError> {
        let pump_count = self.state.pump_count();
        if let Some(index) = inbound
            .iter()
            .filter_map(InboundMessage::pump_index)
            .find(|&index| index >= pump_count)
        {
            return Err(ProtocolError::PumpIndexOutOfRange { index, pump_count });
        }

        for message in inbound {
            self.apply(message)?;
        }
        Ok(())
    }

    /// Classify the snapshot, run the handler for the current mode and
    /// commit its transition.
    pub fn run_mode_handler(&mut self) -> Vec<OutboundMessage> {
        self.state.fault_flags = self.safety.evaluate(&self.state.readings);

        let mut out = TickOutput::new();
        self.fsm.dispatch(&mut self.state, &mut out);
        out.into_messages()
    }

    // ── Operator actions ──────────────────────────────────────

    /// Take pump `index` out of service.  It will not be commanded on again
    /// until [`repair_pump`](Self::repair_pump).
    pub fn mark_pump_broken(&mut self, index: usize) -> core::result::Result<(), ProtocolError> {
        self.state.pump_mut(index)?.set_broken(true);
        info!("pump {index} marked broken");
        Ok(())
    }

    pub fn repair_pump(&mut self, index: usize) -> core::result::Result<(), ProtocolError> {
        self.state.pump_mut(index)?.set_broken(false);
        info!("pump {index} back in service");
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Control cycles executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.fsm.tick_count()
    }

    pub fn ticks_in_current_mode(&self) -> u64 {
        self.fsm.ticks_in_current_mode()
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            mode: self.state.mode,
            tick: self.fsm.tick_count(),
            elapsed_secs: self.fsm.tick_count() as f64 * self.state.tick_period_secs,
            water_level: self.state.readings.water_level,
            steam_rate: self.state.readings.steam_rate,
            pumps_on: self.state.opened_pumps(),
            pump_count: self.state.pump_count(),
            valve_open: self.state.valve_open,
            fault_flags: self.state.fault_flags,
        }
    }

    /// One-line human-readable status for the simulator window.
    pub fn status_message(&self) -> String {
        self.status().to_string()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, message: &InboundMessage) -> core::result::Result<(), ProtocolError> {
        match *message {
            InboundMessage::Mode(mode) => self.state.mode = mode,
            InboundMessage::SteamBoilerWaiting => self.state.boiler_waiting = true,
            InboundMessage::PhysicalUnitsReady => self.state.physical_units_ready = true,
            InboundMessage::PumpState { pump, on } => self.state.pump_mut(pump)?.report_state(on),
            InboundMessage::PumpControlState { pump, on } => {
                self.state.pump_mut(pump)?.report_controller_state(on);
            }
            InboundMessage::Level(v) => self.state.readings.water_level = v,
            InboundMessage::Steam(v) => self.state.readings.steam_rate = v,
            InboundMessage::PumpRepaired(_)
            | InboundMessage::PumpControlRepaired(_)
            | InboundMessage::LevelRepaired
            | InboundMessage::SteamRepaired
            | InboundMessage::PumpFailureAcknowledgement(_)
            | InboundMessage::PumpControlFailureAcknowledgement(_)
            | InboundMessage::LevelFailureAcknowledgement
            | InboundMessage::SteamFailureAcknowledgement
            | InboundMessage::Stop => trace!("ignoring {message:?}"),
        }
        Ok(())
    }
}
