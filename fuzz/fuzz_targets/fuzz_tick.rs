//! Fuzz target: decode a postcard batch and tick the controller with it.
//!
//! Arbitrary bytes are split into batches; every decodable batch is fed to
//! one controller in order.  A tick may reject a batch (bad pump index) but
//! must never panic, and EMERGENCY_STOP must hold once entered unless an
//! inbound MODE message overrides it.
//!
//! cargo fuzz run fuzz_tick

#![no_main]

use libfuzzer_sys::fuzz_target;
use steam_boiler::app::events::InboundMessage;
use steam_boiler::app::service::BoilerController;
use steam_boiler::config::BoilerConfig;
use steam_boiler::fsm::Mode;
use steam_boiler::wire::decode_batch;

fuzz_target!(|data: &[u8]| {
    let Ok(mut controller) = BoilerController::new(&BoilerConfig::default()) else {
        return;
    };

    for chunk in data.split(|&b| b == 0xff) {
        let Ok(batch) = decode_batch::<InboundMessage>(chunk) else {
            continue;
        };
        let was_stopped = controller.mode() == Mode::EmergencyStop;
        let overridden = batch.iter().any(|m| matches!(m, InboundMessage::Mode(_)));

        if controller.tick(&batch).is_ok() && was_stopped && !overridden {
            assert_eq!(controller.mode(), Mode::EmergencyStop);
        }
        let _ = controller.status_message();
    }
});
