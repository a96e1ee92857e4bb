//! NORMAL, DEGRADED, RESCUE and EMERGENCY_STOP over multi-tick runs.

use steam_boiler::Error;
use steam_boiler::app::commands::OutboundMessage;
use steam_boiler::app::events::InboundMessage;
use steam_boiler::app::service::BoilerController;
use steam_boiler::error::ProtocolError;
use steam_boiler::fsm::Mode;

use crate::harness::{close_all, normal_controller, open_first, readings};

// ── Regulation ────────────────────────────────────────────────

#[test]
fn above_n2_runs_one_pump() {
    let mut c = normal_controller();
    assert_eq!(c.tick(&readings(650.0, 5.0)).unwrap(), open_first(1));
    assert_eq!(c.mode(), Mode::Normal);
}

#[test]
fn below_n1_runs_every_pump() {
    let mut c = normal_controller();
    assert_eq!(c.tick(&readings(300.0, 5.0)).unwrap(), open_first(4));
}

#[test]
fn band_steps_one_pump_at_a_time() {
    let mut c = normal_controller();
    c.tick(&readings(300.0, 5.0)).unwrap();

    // Upper half: one fewer.
    assert_eq!(c.tick(&readings(550.0, 5.0)).unwrap(), open_first(3));
    assert_eq!(c.tick(&readings(520.0, 5.0)).unwrap(), open_first(2));

    // Lower half: one more.
    assert_eq!(c.tick(&readings(450.0, 5.0)).unwrap(), open_first(3));
}

#[test]
fn midpoint_holds_current_pumps() {
    let mut c = normal_controller();
    c.tick(&readings(450.0, 5.0)).unwrap();
    assert!(c.tick(&readings(500.0, 5.0)).unwrap().is_empty());
    assert_eq!(c.state().opened_pumps(), 1);
}

#[test]
fn plant_pump_reports_feed_the_running_count() {
    let mut c = normal_controller();
    let mut batch = readings(550.0, 5.0);
    batch.push(InboundMessage::PumpState { pump: 0, on: true });
    batch.push(InboundMessage::PumpState { pump: 1, on: true });
    assert_eq!(c.tick(&batch).unwrap(), open_first(1));
}

#[test]
fn broken_pump_slot_is_skipped() {
    let mut c = normal_controller();
    c.mark_pump_broken(0).unwrap();

    let mut expected = close_all();
    expected.extend([1, 2, 3].map(OutboundMessage::OpenPump));
    assert_eq!(c.tick(&readings(300.0, 5.0)).unwrap(), expected);
    assert_eq!(c.state().opened_pumps(), 3);
}

// ── Sensor failures ───────────────────────────────────────────

/// A controller already in RESCUE, moved there by an unreadable level.
fn rescue_controller() -> BoilerController {
    let mut c = normal_controller();
    c.tick(&readings(f64::NAN, 5.0)).unwrap();
    assert_eq!(c.mode(), Mode::Rescue);
    c
}

#[test]
fn negative_level_announces_rescue_but_stops() {
    let mut c = normal_controller();
    let out = c.tick(&readings(-1.0, 5.0)).unwrap();
    assert_eq!(
        out,
        vec![
            OutboundMessage::Mode(Mode::EmergencyStop),
            OutboundMessage::LevelFailureDetected,
            OutboundMessage::Mode(Mode::Rescue),
            OutboundMessage::Mode(Mode::EmergencyStop),
        ]
    );
    assert_eq!(c.mode(), Mode::EmergencyStop);
}

#[test]
fn reading_above_capacity_stops() {
    for level in [1000.0, 1200.0] {
        let mut c = normal_controller();
        let out = c.tick(&readings(level, 5.0)).unwrap();
        assert_eq!(out[0], OutboundMessage::Mode(Mode::EmergencyStop), "level {level}");
        assert!(out.contains(&OutboundMessage::LevelFailureDetected));
        assert_eq!(c.mode(), Mode::EmergencyStop);
    }
}

#[test]
fn unreadable_level_enters_rescue() {
    let mut c = normal_controller();
    assert_eq!(
        c.tick(&readings(f64::NAN, 5.0)).unwrap(),
        vec![
            OutboundMessage::LevelFailureDetected,
            OutboundMessage::Mode(Mode::Rescue),
        ]
    );
    assert_eq!(c.mode(), Mode::Rescue);
}

#[test]
fn steam_failure_enters_degraded_and_keeps_regulating() {
    let mut c = normal_controller();
    assert_eq!(
        c.tick(&readings(500.0, -1.0)).unwrap(),
        vec![
            OutboundMessage::SteamFailureDetected,
            OutboundMessage::Mode(Mode::Degraded),
        ]
    );
    assert_eq!(c.mode(), Mode::Degraded);

    // Already degraded: no second notice, regulation only.
    assert_eq!(c.tick(&readings(650.0, -1.0)).unwrap(), open_first(1));
    assert_eq!(c.mode(), Mode::Degraded);
}

#[test]
fn degraded_level_failure_enters_rescue() {
    let mut c = normal_controller();
    c.tick(&readings(500.0, -1.0)).unwrap();
    assert_eq!(
        c.tick(&readings(f64::NAN, -1.0)).unwrap(),
        vec![
            OutboundMessage::LevelFailureDetected,
            OutboundMessage::Mode(Mode::Rescue),
        ]
    );
}

#[test]
fn both_sensors_failing_is_emergency_stop() {
    let mut c = normal_controller();
    assert_eq!(
        c.tick(&readings(f64::NAN, -1.0)).unwrap(),
        vec![
            OutboundMessage::LevelFailureDetected,
            OutboundMessage::Mode(Mode::Rescue),
            OutboundMessage::SteamFailureDetected,
            OutboundMessage::Mode(Mode::Degraded),
            OutboundMessage::Mode(Mode::EmergencyStop),
        ]
    );
    assert_eq!(c.mode(), Mode::EmergencyStop);
}

// ── RESCUE ────────────────────────────────────────────────────

#[test]
fn rescue_does_not_regulate() {
    let mut c = rescue_controller();
    assert!(c.tick(&readings(300.0, 5.0)).unwrap().is_empty());
    assert_eq!(c.mode(), Mode::Rescue);
}

#[test]
fn rescue_steam_failure_is_emergency_stop() {
    let mut c = rescue_controller();
    assert_eq!(
        c.tick(&readings(500.0, -1.0)).unwrap(),
        vec![OutboundMessage::Mode(Mode::EmergencyStop)]
    );
}

#[test]
fn rescue_still_watches_physical_limits() {
    for level in [20.0, 1200.0] {
        let mut c = rescue_controller();
        c.tick(&readings(level, 5.0)).unwrap();
        assert_eq!(c.mode(), Mode::EmergencyStop, "level {level}");
    }
}

#[test]
fn operator_mode_override_leaves_rescue() {
    let mut c = rescue_controller();

    let mut batch = vec![InboundMessage::Mode(Mode::Normal)];
    batch.extend(readings(650.0, 5.0));
    assert_eq!(c.tick(&batch).unwrap(), open_first(1));
    assert_eq!(c.mode(), Mode::Normal);
    assert_eq!(c.ticks_in_current_mode(), 0);
}

// ── EMERGENCY_STOP ────────────────────────────────────────────

#[test]
fn level_above_m2_is_emergency_stop() {
    let mut c = normal_controller();
    assert_eq!(
        c.tick(&readings(951.0, 5.0)).unwrap(),
        vec![OutboundMessage::Mode(Mode::EmergencyStop)]
    );
}

#[test]
fn level_below_m1_is_emergency_stop() {
    let mut c = normal_controller();
    assert_eq!(
        c.tick(&readings(49.0, 5.0)).unwrap(),
        vec![OutboundMessage::Mode(Mode::EmergencyStop)]
    );
}

#[test]
fn emergency_stop_is_terminal() {
    let mut c = normal_controller();
    c.tick(&readings(951.0, 5.0)).unwrap();
    for level in [500.0, 300.0, 650.0] {
        assert_eq!(
            c.tick(&readings(level, 5.0)).unwrap(),
            vec![OutboundMessage::Mode(Mode::EmergencyStop)]
        );
    }
    assert_eq!(c.ticks_in_current_mode(), 3);
}

// ── Protocol violations ───────────────────────────────────────

#[test]
fn unknown_pump_index_fails_the_tick() {
    let mut c = normal_controller();
    let ticks = c.tick_count();

    let mut batch = readings(300.0, 5.0);
    batch.push(InboundMessage::PumpControlState { pump: 7, on: true });
    let err = c.tick(&batch).unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::PumpIndexOutOfRange { index: 7, pump_count: 4 })
    ));
    assert_eq!(c.tick_count(), ticks, "mode handler must not run");
    assert_eq!(c.state().readings.water_level, 500.0);
}
