//! Stateful record decoder.
//!
//! One `StatefulDecoder` is owned by each decode worker and fed that
//! worker's records in order. It remembers the ADS-B version each emitter
//! announced in its operational status, which selects the surface position
//! variant for later records from the same emitter.

use std::collections::HashMap;

use crate::decode::decode_frame;
use crate::frame::parse_record;
use crate::types::*;

/// Running counters for one decoder instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub decoded: u64,
    pub corrected: u64,
}

/// Decoder with per-emitter context carried across calls.
#[derive(Debug, Default)]
pub struct StatefulDecoder {
    versions: HashMap<Icao, AdsbVersion>,
    stats: DecoderStats,
}

impl StatefulDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one 14-byte record. `timestamp` is stamped on the message.
    pub fn decode(&mut self, record: &[u8], timestamp: u64) -> Result<Message> {
        let frame = parse_record(record)?;
        let version = self.version_of(&frame.icao);
        let kind = decode_frame(&frame, version);

        if let MessageKind::OperationalStatus { version } = kind {
            self.versions.insert(frame.icao, version);
        }
        self.stats.decoded += 1;
        if frame.corrected {
            self.stats.corrected += 1;
        }

        Ok(Message {
            icao: frame.icao,
            df: frame.df,
            timestamp,
            kind,
        })
    }

    /// Last ADS-B version announced by `icao`, V0 if never seen.
    pub fn version_of(&self, icao: &Icao) -> AdsbVersion {
        self.versions.get(icao).copied().unwrap_or_default()
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
