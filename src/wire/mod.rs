//! Binary framed transport.
//!
//! Each tick's batch travels as one length-prefixed postcard frame (see
//! [`codec`]).  [`FramedTransport`] speaks this format over any byte stream
//! (a pipe, a socket, stdin/stdout).

pub mod codec;

use std::io::{ErrorKind, Read, Write};

pub use codec::{FrameDecoder, MAX_FRAME_SIZE, decode_batch, encode_batch};

use crate::app::commands::OutboundMessage;
use crate::app::events::InboundMessage;
use crate::app::ports::Transport;
use crate::error::TransportError;

const READ_CHUNK: usize = 512;

pub struct FramedTransport<S> {
    stream: S,
    decoder: FrameDecoder,
    /// Bytes read from the stream but not yet fed to the decoder.
    pending: Vec<u8>,
}

impl<S: Read + Write> FramedTransport<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            decoder: FrameDecoder::new(),
            pending: Vec::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Feed buffered bytes until a frame completes or the buffer runs dry.
    fn next_buffered_frame(&mut self) -> Result<Option<Vec<InboundMessage>>, TransportError> {
        while !self.pending.is_empty() {
            let (used, frame) = match self.decoder.feed(&self.pending) {
                Ok((used, frame)) => (used, frame.map(decode_batch)),
                Err(e) => {
                    self.pending.clear();
                    return Err(e);
                }
            };
            self.pending = self.pending.split_off(used);
            if let Some(batch) = frame {
                return batch.map(Some);
            }
        }
        Ok(None)
    }
}

impl<S: Read + Write> Transport for FramedTransport<S> {
    fn receive(&mut self) -> Result<Vec<InboundMessage>, TransportError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(batch) = self.next_buffered_frame()? {
                return Ok(batch);
            }
            let n = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                return Err(TransportError::Closed);
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }

    fn send(&mut self, batch: &[OutboundMessage]) -> Result<(), TransportError> {
        let frame = encode_batch(batch)?;
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        Ok(())
    }
}
