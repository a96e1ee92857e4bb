//! In-memory transport.
//!
//! Holds a queue of scripted inbound batches and records every outbound
//! batch, so a test (or a scripted run) can assert on the full command
//! history without a plant.

use std::collections::VecDeque;

use crate::app::commands::OutboundMessage;
use crate::app::events::InboundMessage;
use crate::app::ports::Transport;
use crate::error::TransportError;

#[derive(Debug, Default, Clone)]
pub struct Mailbox {
    inbound: VecDeque<Vec<InboundMessage>>,
    sent: Vec<Vec<OutboundMessage>>,
    /// When set, an empty queue reports `Closed` instead of an empty batch.
    close_when_drained: bool,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox that closes once every scripted batch has been received.
    pub fn scripted(batches: impl IntoIterator<Item = Vec<InboundMessage>>) -> Self {
        Self {
            inbound: batches.into_iter().collect(),
            sent: Vec::new(),
            close_when_drained: true,
        }
    }

    /// Queue the batch for a future tick.
    pub fn push(&mut self, batch: Vec<InboundMessage>) {
        self.inbound.push_back(batch);
    }

    /// Every outbound batch, oldest first.
    pub fn sent(&self) -> &[Vec<OutboundMessage>] {
        &self.sent
    }

    pub fn last_sent(&self) -> Option<&[OutboundMessage]> {
        self.sent.last().map(Vec::as_slice)
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for Mailbox {
    fn receive(&mut self) -> Result<Vec<InboundMessage>, TransportError> {
        match self.inbound.pop_front() {
            Some(batch) => Ok(batch),
            None if self.close_when_drained => Err(TransportError::Closed),
            None => Ok(Vec::new()),
        }
    }

    fn send(&mut self, batch: &[OutboundMessage]) -> Result<(), TransportError> {
        self.sent.push(batch.to_vec());
        Ok(())
    }
}
