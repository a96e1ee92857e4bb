//! Whole runs through each transport adapter.

use std::io::{Cursor, Read, Write};

use steam_boiler::Error;
use steam_boiler::adapters::mailbox::Mailbox;
use steam_boiler::adapters::replay::JsonLinesTransport;
use steam_boiler::app::commands::OutboundMessage;
use steam_boiler::app::events::InboundMessage;
use steam_boiler::app::ports::Transport;
use steam_boiler::app::service::BoilerController;
use steam_boiler::error::TransportError;
use steam_boiler::fsm::Mode;
use steam_boiler::wire::{FrameDecoder, FramedTransport, decode_batch, encode_batch};

use crate::harness::{controller, open_first, readings, ready, waiting};

/// Clock until the transport closes; returns the number of ticks run.
fn run_to_close(c: &mut BoilerController, transport: &mut impl Transport) -> u64 {
    loop {
        match c.clock(transport) {
            Ok(()) => {}
            Err(Error::Transport(TransportError::Closed)) => return c.tick_count(),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn mailbox_run_from_fill_to_normal() {
    let mut c = controller();
    let mut mailbox = Mailbox::scripted([
        waiting(100.0, 0.0),
        waiting(450.0, 0.0),
        ready(450.0, 0.0),
        readings(650.0, 4.0),
    ]);

    assert_eq!(run_to_close(&mut c, &mut mailbox), 4);
    assert_eq!(c.mode(), Mode::Normal);

    let sent = mailbox.sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(
        sent[1],
        vec![
            OutboundMessage::ProgramReady,
            OutboundMessage::Mode(Mode::Initialisation),
        ]
    );
    assert_eq!(sent[2], vec![OutboundMessage::Mode(Mode::Normal)]);
    assert_eq!(sent[3], open_first(1));
}

#[test]
fn json_lines_replay_writes_one_line_per_tick() {
    let script = "\
# start-up
[{\"Level\":500.0},{\"Steam\":0.0},\"SteamBoilerWaiting\"]
[{\"Level\":500.0},{\"Steam\":0.0},\"PhysicalUnitsReady\"]

[{\"Level\":-1.0},{\"Steam\":3.0}]
";
    let mut c = controller();
    let mut transport = JsonLinesTransport::new(script.as_bytes(), Vec::new());
    assert_eq!(run_to_close(&mut c, &mut transport), 3);

    let written = String::from_utf8(transport.into_writer()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[\"ProgramReady\",{\"Mode\":\"Initialisation\"}]",
            "[{\"Mode\":\"Normal\"}]",
            "[{\"Mode\":\"EmergencyStop\"},\"LevelFailureDetected\",{\"Mode\":\"Rescue\"},{\"Mode\":\"EmergencyStop\"}]",
        ]
    );
}

#[test]
fn framed_run_answers_every_frame() {
    let mut input = Vec::new();
    input.extend(encode_batch(&ready(500.0, 0.0)).unwrap());
    input.extend(encode_batch(&readings(951.0, 0.0)).unwrap());

    let stream = Loopback {
        input: Cursor::new(input),
        output: Vec::new(),
    };
    let mut transport = FramedTransport::new(stream);
    let mut c = controller();
    assert_eq!(run_to_close(&mut c, &mut transport), 2);

    let output = transport.into_inner().output;
    let mut dec = FrameDecoder::new();
    let mut rest = &output[..];
    let mut replies: Vec<Vec<OutboundMessage>> = Vec::new();
    while !rest.is_empty() {
        let (used, payload) = dec.feed(rest).unwrap();
        if let Some(p) = payload {
            replies.push(decode_batch(p).unwrap());
        }
        rest = &rest[used..];
    }

    assert_eq!(
        replies,
        vec![
            vec![OutboundMessage::Mode(Mode::Normal)],
            vec![OutboundMessage::Mode(Mode::EmergencyStop)],
        ]
    );
}

#[test]
fn protocol_error_surfaces_through_clock() {
    let mut c = controller();
    let mut mailbox = Mailbox::scripted([vec![InboundMessage::PumpState { pump: 4, on: true }]]);
    assert!(matches!(c.clock(&mut mailbox), Err(Error::Protocol(_))));
    assert!(mailbox.sent().is_empty(), "nothing is sent for a rejected batch");
}

struct Loopback {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Read for Loopback {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Loopback {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
