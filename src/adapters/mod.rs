//! Adapters: concrete implementations of the [`Transport`] port.
//!
//! | Adapter   | Implements | Connects to                          |
//! |-----------|------------|--------------------------------------|
//! | `mailbox` | Transport  | In-memory scripted batches           |
//! | `replay`  | Transport  | JSON-lines reader/writer             |
//!
//! The binary framed transport lives in [`crate::wire`].
//!
//! [`Transport`]: crate::app::ports::Transport

pub mod mailbox;
pub mod replay;
