//! Water level control.

pub mod regulation;
