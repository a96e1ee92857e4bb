//! Port traits: the boundary between the controller and the plant.
//!
//! ```text
//!   Transport adapter ──▶ Transport trait ──▶ BoilerController (domain)
//! ```
//!
//! The controller never initiates I/O outside the per-tick exchange: it
//! asks the transport for exactly one inbound batch and hands back exactly
//! one outbound batch.  Adapters live in [`crate::adapters`] and
//! [`crate::wire`].

use super::commands::OutboundMessage;
use super::events::InboundMessage;
use crate::error::TransportError;

/// Per-tick message exchange with the physical units.
pub trait Transport {
    /// The complete, ordered batch of messages for the next tick.
    ///
    /// Returns [`TransportError::Closed`] once the plant has nothing more
    /// to say.
    fn receive(&mut self) -> Result<Vec<InboundMessage>, TransportError>;

    /// Deliver the complete, ordered batch produced by one tick.
    fn send(&mut self, batch: &[OutboundMessage]) -> Result<(), TransportError>;
}
