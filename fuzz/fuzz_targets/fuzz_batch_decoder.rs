//! Fuzz target: `FrameDecoder::feed` + `decode_batch`
//!
//! Drives arbitrary byte sequences through the streaming frame decoder and
//! decodes every completed frame as an inbound batch.  Neither step may
//! panic, and no payload may exceed the frame limit.
//!
//! cargo fuzz run fuzz_batch_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use steam_boiler::app::events::InboundMessage;
use steam_boiler::wire::{FrameDecoder, MAX_FRAME_SIZE, decode_batch};

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();
    let mut rest = data;

    while !rest.is_empty() {
        let Ok((used, payload)) = decoder.feed(rest) else {
            // Oversized header; the decoder has reset itself.
            break;
        };
        if let Some(payload) = payload {
            assert!(payload.len() <= MAX_FRAME_SIZE, "payload exceeds MAX_FRAME_SIZE");
            assert!(!payload.is_empty(), "decoder must not yield empty payload");
            let _ = decode_batch::<InboundMessage>(payload);
        }
        assert!(used > 0 && used <= rest.len(), "feed must make progress");
        rest = &rest[used..];
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    let _ = decoder.feed(data);
});
