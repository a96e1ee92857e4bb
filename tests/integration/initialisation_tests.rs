//! INITIALISATION: start-up fill/drain and the hand-over to NORMAL.

use steam_boiler::app::commands::OutboundMessage;
use steam_boiler::fsm::Mode;

use crate::harness::{close_all, controller, open_first, ready, readings, waiting};

#[test]
fn idle_tick_reasserts_initialisation() {
    let mut c = controller();
    let out = c.tick(&readings(0.0, 0.0)).unwrap();
    assert_eq!(out, vec![OutboundMessage::Mode(Mode::Initialisation)]);
    assert_eq!(c.mode(), Mode::Initialisation);
}

#[test]
fn level_in_band_reports_program_ready() {
    let mut c = controller();
    let out = c.tick(&waiting(500.0, 0.0)).unwrap();
    assert_eq!(
        out,
        vec![
            OutboundMessage::ProgramReady,
            OutboundMessage::Mode(Mode::Initialisation),
        ]
    );
    assert!(out.iter().all(|m| !m.is_actuator_command()));
}

#[test]
fn low_level_fills_with_sized_pump_count() {
    let mut c = controller();
    // ((50 + 600/2) - 100) / (15 * 10) = 1.67 -> 1 pump
    let mut expected = open_first(1);
    expected.push(OutboundMessage::Mode(Mode::Initialisation));
    assert_eq!(c.tick(&waiting(100.0, 0.0)).unwrap(), expected);
    assert_eq!(c.state().opened_pumps(), 1);
}

#[test]
fn empty_tank_fill_is_sized_by_formula() {
    let mut c = controller();
    // (350 - 0) / 150 = 2.33 -> 2 pumps
    let out = c.tick(&waiting(0.0, 0.0)).unwrap();
    assert_eq!(c.state().opened_pumps(), 2);
    assert_eq!(out.last(), Some(&OutboundMessage::Mode(Mode::Initialisation)));
}

#[test]
fn high_level_opens_valve_once() {
    let mut c = controller();
    assert_eq!(
        c.tick(&waiting(700.0, 0.0)).unwrap(),
        vec![OutboundMessage::Valve, OutboundMessage::Mode(Mode::Initialisation)]
    );
    assert!(c.state().valve_open);

    // Still draining: the valve is already open, don't toggle it shut.
    assert_eq!(
        c.tick(&waiting(650.0, 0.0)).unwrap(),
        vec![OutboundMessage::Mode(Mode::Initialisation)]
    );
    assert!(c.state().valve_open);
}

#[test]
fn drained_past_band_closes_valve_before_filling() {
    let mut c = controller();
    c.tick(&waiting(700.0, 0.0)).unwrap();

    // (350 - 300) / 150 = 0.33 -> 0 pumps, but every pump is still closed.
    let out = c.tick(&waiting(300.0, 0.0)).unwrap();
    let mut expected = vec![OutboundMessage::Valve];
    expected.extend(close_all());
    expected.push(OutboundMessage::Mode(Mode::Initialisation));
    assert_eq!(out, expected);
    assert!(!c.state().valve_open);
}

#[test]
fn level_exactly_n1_opens_one_pump() {
    let mut c = controller();
    let out = c.tick(&waiting(400.0, 0.0)).unwrap();
    assert_eq!(c.state().opened_pumps(), 1);
    assert_eq!(out.last(), Some(&OutboundMessage::Mode(Mode::Initialisation)));
}

#[test]
fn steam_while_waiting_is_emergency_stop() {
    let mut c = controller();
    let out = c.tick(&waiting(500.0, 2.0)).unwrap();
    assert_eq!(out, vec![OutboundMessage::Mode(Mode::EmergencyStop)]);
    assert_eq!(c.mode(), Mode::EmergencyStop);
}

#[test]
fn unusable_level_is_emergency_stop() {
    let mut c = controller();
    let out = c.tick(&waiting(-1.0, 0.0)).unwrap();
    assert_eq!(out, vec![OutboundMessage::Mode(Mode::EmergencyStop)]);
}

#[test]
fn units_ready_enters_normal() {
    let mut c = controller();
    let out = c.tick(&ready(500.0, 0.0)).unwrap();
    assert_eq!(out, vec![OutboundMessage::Mode(Mode::Normal)]);
    assert_eq!(c.mode(), Mode::Normal);
    assert_eq!(c.ticks_in_current_mode(), 0);
}

#[test]
fn units_ready_closes_open_valve() {
    let mut c = controller();
    c.tick(&waiting(700.0, 0.0)).unwrap();
    let out = c.tick(&ready(550.0, 0.0)).unwrap();
    assert_eq!(
        out,
        vec![OutboundMessage::Valve, OutboundMessage::Mode(Mode::Normal)]
    );
    assert!(!c.state().valve_open);
}

#[test]
fn waiting_flag_is_latched() {
    let mut c = controller();
    c.tick(&waiting(100.0, 0.0)).unwrap();
    // No SteamBoilerWaiting this tick, the fill continues.
    let out = c.tick(&readings(200.0, 0.0)).unwrap();
    assert!(out.iter().any(OutboundMessage::is_actuator_command));
}
