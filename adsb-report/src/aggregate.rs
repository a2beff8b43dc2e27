//! Group decoded messages by emitter and build per-emitter report entries.

use std::collections::BTreeMap;
use std::fmt;

use adsb_core::{icao_to_string, Icao, Message, MessageKind};

/// Placeholder printed for a field with no data.
pub const NO_INFO: &str = "NO INFO";

/// Line separator used inside and after report entries.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

const RULE: &str = "----------------------------------------------------------";

/// All messages from one emitter, in merged input order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterGroup {
    pub icao: Icao,
    pub messages: Vec<Message>,
}

/// Partition `messages` by emitter address. Groups come out in ascending
/// address order; each group keeps the relative input order.
pub fn group_by_emitter(messages: Vec<Message>) -> Vec<EmitterGroup> {
    let mut groups: BTreeMap<Icao, Vec<Message>> = BTreeMap::new();
    for msg in messages {
        groups.entry(msg.icao).or_default().push(msg);
    }
    groups
        .into_iter()
        .map(|(icao, messages)| EmitterGroup { icao, messages })
        .collect()
}

/// Summary of one emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub address: String,
    /// First identification seen in the group, trailing padding removed.
    pub callsign: Option<String>,
    /// Distinct surface ground speeds, first-seen order.
    pub ground_speeds: Vec<f64>,
    /// Every airspeed, group order, duplicates kept.
    pub airspeeds: Vec<u16>,
}

impl ReportEntry {
    pub fn from_group(group: &EmitterGroup) -> Self {
        let mut callsign = None;
        let mut ground_speeds: Vec<f64> = Vec::new();
        let mut airspeeds = Vec::new();

        for msg in &group.messages {
            match &msg.kind {
                MessageKind::Identification { callsign: cs, .. } if callsign.is_none() => {
                    callsign = Some(cs.trim_end().to_string());
                }
                MessageKind::AirspeedHeading {
                    airspeed_kts: Some(kts),
                    ..
                } => airspeeds.push(*kts),
                MessageKind::SurfacePosition {
                    ground_speed_kts: Some(gs),
                    ..
                } => {
                    if !ground_speeds.contains(gs) {
                        ground_speeds.push(*gs);
                    }
                }
                _ => {}
            }
        }

        ReportEntry {
            address: icao_to_string(&group.icao),
            callsign,
            ground_speeds,
            airspeeds,
        }
    }
}

fn join_or_no_info<T: fmt::Display>(values: &[T]) -> String {
    if values.is_empty() {
        return NO_INFO.to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nl = LINE_SEPARATOR;
        write!(f, "[ICAO]: {}{nl}", self.address)?;
        write!(f, "[CallSign]: {}{nl}", self.callsign.as_deref().unwrap_or(NO_INFO))?;
        write!(f, "[Ground speed]: {{{}}}{nl}", join_or_no_info(&self.ground_speeds))?;
        write!(f, "[Air speed]: {{{}}}{nl}", join_or_no_info(&self.airspeeds))?;
        write!(f, "{RULE}")
    }
}

/// Group `messages` and render one entry per emitter.
pub fn build_report(messages: Vec<Message>) -> Vec<ReportEntry> {
    group_by_emitter(messages)
        .iter()
        .map(ReportEntry::from_group)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
