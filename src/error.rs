//! Unified error types for the boiler controller.
//!
//! Sensor failures and limit violations are *not* errors: they are domain
//! events handled by mode transitions.  The types here cover the things the
//! controller refuses to mask: a plant that talks about pumps it does not
//! have, an unusable configuration, and a broken transport.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Error)]
pub enum Error {
    /// The inbound batch violated the plant/transport contract.
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),
    /// Configuration is invalid or could not be loaded.
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    /// The message transport failed.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

// ---------------------------------------------------------------------------
// Protocol violations
// ---------------------------------------------------------------------------

/// Fatal: the plant model is inconsistent with the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("pump index {index} out of range (pump count {pump_count})")]
    PumpIndexOutOfRange { index: usize, pump_count: usize },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed range validation.  The message names the field.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON batch: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed binary batch: {0}")]
    Decode(#[from] postcard::Error),
    #[error("frame of {len} bytes exceeds the maximum frame size")]
    FrameTooLarge { len: usize },
    /// The peer closed the channel; no further batches will arrive.
    #[error("transport closed")]
    Closed,
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
