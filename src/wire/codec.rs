//! Length-prefix frame codec for message batches.
//!
//! Wire format:
//! ```text
//! ┌────────────┬────────────────────────────┐
//! │ Length (4B)│ postcard batch (N B)       │
//! │ LE u32     │                            │
//! └────────────┴────────────────────────────┘
//! ```
//!
//! One frame carries one tick's batch.  The decoder accumulates incoming
//! bytes and yields complete payloads, so a single read may deliver part of
//! a header, part of a payload, or several frames back to back.

use heapless::Vec as FrameBuf;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// Maximum frame payload size (protects against memory exhaustion).
pub const MAX_FRAME_SIZE: usize = 4096;

/// Frame header size (4-byte little-endian length).
pub const HEADER_SIZE: usize = 4;

/// Decoder state machine.
enum DecoderState {
    /// Waiting for header bytes.
    ReadingHeader { collected: usize },
    /// Header received, reading payload.
    ReadingPayload { expected: usize },
}

/// Streaming frame decoder.
pub struct FrameDecoder {
    state: DecoderState,
    header_buf: [u8; HEADER_SIZE],
    payload_buf: FrameBuf<u8, MAX_FRAME_SIZE>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::ReadingHeader { collected: 0 },
            header_buf: [0; HEADER_SIZE],
            payload_buf: FrameBuf::new(),
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Consumes bytes up to and including the end of the first complete
    /// frame and returns how many were consumed, together with the payload
    /// if a frame completed.  Call again with the remainder to continue.
    /// The payload slice is valid until the next call to `feed`.
    pub fn feed(&mut self, data: &[u8]) -> Result<(usize, Option<&[u8]>), TransportError> {
        let mut offset = 0;

        while offset < data.len() {
            match &mut self.state {
                DecoderState::ReadingHeader { collected } => {
                    let to_copy = (HEADER_SIZE - *collected).min(data.len() - offset);
                    self.header_buf[*collected..*collected + to_copy]
                        .copy_from_slice(&data[offset..offset + to_copy]);
                    *collected += to_copy;
                    offset += to_copy;

                    if *collected == HEADER_SIZE {
                        let expected = u32::from_le_bytes(self.header_buf) as usize;
                        if expected > MAX_FRAME_SIZE {
                            self.reset();
                            return Err(TransportError::FrameTooLarge { len: expected });
                        }
                        self.payload_buf.clear();
                        if expected == 0 {
                            // An empty batch still encodes to at least one byte,
                            // so a zero-length frame carries nothing.
                            self.state = DecoderState::ReadingHeader { collected: 0 };
                            continue;
                        }
                        self.state = DecoderState::ReadingPayload { expected };
                    }
                }

                DecoderState::ReadingPayload { expected } => {
                    let expected = *expected;
                    let to_copy = (expected - self.payload_buf.len()).min(data.len() - offset);
                    if self
                        .payload_buf
                        .extend_from_slice(&data[offset..offset + to_copy])
                        .is_err()
                    {
                        self.reset();
                        return Err(TransportError::FrameTooLarge { len: expected });
                    }
                    offset += to_copy;

                    if self.payload_buf.len() == expected {
                        self.state = DecoderState::ReadingHeader { collected: 0 };
                        return Ok((offset, Some(self.payload_buf.as_slice())));
                    }
                }
            }
        }

        Ok((offset, None))
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::ReadingHeader { collected: 0 };
        self.payload_buf.clear();
    }
}

/// Encode a batch as a complete length-prefixed frame.
pub fn encode_batch<T: Serialize>(batch: &[T]) -> Result<Vec<u8>, TransportError> {
    let payload = postcard::to_allocvec(batch)?;
    if payload.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge { len: payload.len() });
    }
    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode a frame payload (without header) into a batch.
pub fn decode_batch<T: DeserializeOwned>(payload: &[u8]) -> Result<Vec<T>, TransportError> {
    Ok(postcard::from_bytes(payload)?)
}
