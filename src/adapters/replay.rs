//! JSON-lines transport.
//!
//! Wire format, one tick per line:
//!
//! ```text
//! in : [{"Level":450.0},{"Steam":0.0},"SteamBoilerWaiting"]
//! out: [{"Mode":"Initialisation"}]
//! ```
//!
//! Blank lines and lines starting with `#` are skipped on input, so replay
//! scripts can be annotated.

use std::io::{BufRead, Write};

use crate::app::commands::OutboundMessage;
use crate::app::events::InboundMessage;
use crate::app::ports::Transport;
use crate::error::TransportError;

pub struct JsonLinesTransport<R, W> {
    reader: R,
    writer: W,
    line: String,
}

impl<R: BufRead, W: Write> JsonLinesTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line: String::new(),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Transport for JsonLinesTransport<R, W> {
    fn receive(&mut self) -> Result<Vec<InboundMessage>, TransportError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(TransportError::Closed);
            }
            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(serde_json::from_str(trimmed)?);
        }
    }

    fn send(&mut self, batch: &[OutboundMessage]) -> Result<(), TransportError> {
        serde_json::to_writer(&mut self.writer, batch)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
