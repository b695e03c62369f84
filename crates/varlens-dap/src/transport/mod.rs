//! Wire transport for DAP messages.

pub mod framing;
