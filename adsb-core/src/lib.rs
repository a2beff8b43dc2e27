//! adsb-core: Pure record decoding for Mode S / ADS-B captures.
//!
//! No async, no I/O: just algorithms. Turns fixed 14-byte records into
//! typed messages; the batch pipeline in `adsb-report` drives it.

pub mod crc;
pub mod decode;
pub mod decoder;
pub mod frame;
pub mod types;

// Re-export commonly used types at crate root
pub use decoder::{DecoderStats, StatefulDecoder};
pub use frame::{parse_record, ModeFrame};
pub use types::*;
