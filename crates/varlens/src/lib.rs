//! VarLens core — turns image containers and debug-target payloads into one
//! canonical tensor representation a renderer can consume uniformly.

pub mod decode;
pub mod payload;
pub mod sniff;
pub mod types;

pub use decode::{decode_from_file, decode_from_memory};
pub use payload::read_payload;
pub use sniff::{detect, sniff, ImageKind};
pub use types::*;
