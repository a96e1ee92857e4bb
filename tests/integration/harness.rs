//! Shared fixtures: the reference boiler and batch builders.
//!
//! Reference boiler: capacity 1000, M1 50, N1 400, N2 600, M2 950,
//! four pumps of 10 l/s.  The normal band midpoint is 500.

use steam_boiler::app::commands::OutboundMessage;
use steam_boiler::app::events::InboundMessage;
use steam_boiler::app::service::BoilerController;
use steam_boiler::config::BoilerConfig;
use steam_boiler::fsm::Mode;

pub fn controller() -> BoilerController {
    BoilerController::new(&BoilerConfig::default()).expect("reference config is valid")
}

/// Level and steam readings, the minimum every tick carries.
pub fn readings(level: f64, steam: f64) -> Vec<InboundMessage> {
    vec![InboundMessage::Level(level), InboundMessage::Steam(steam)]
}

pub fn waiting(level: f64, steam: f64) -> Vec<InboundMessage> {
    let mut batch = readings(level, steam);
    batch.push(InboundMessage::SteamBoilerWaiting);
    batch
}

pub fn ready(level: f64, steam: f64) -> Vec<InboundMessage> {
    let mut batch = readings(level, steam);
    batch.push(InboundMessage::PhysicalUnitsReady);
    batch
}

/// A controller already in NORMAL with every pump off.
pub fn normal_controller() -> BoilerController {
    let mut c = controller();
    let out = c.tick(&ready(500.0, 0.0)).unwrap();
    assert_eq!(out, vec![OutboundMessage::Mode(Mode::Normal)]);
    c
}

/// CLOSE_PUMP for every index of the reference boiler.
pub fn close_all() -> Vec<OutboundMessage> {
    (0..4).map(OutboundMessage::ClosePump).collect()
}

/// `close_all()` followed by OPEN_PUMP for `0..count`.
pub fn open_first(count: usize) -> Vec<OutboundMessage> {
    let mut out = close_all();
    out.extend((0..count).map(OutboundMessage::OpenPump));
    out
}
