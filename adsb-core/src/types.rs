//! Shared types, error enum, and decoded message types for adsb-core.

use serde::Serialize;
use thiserror::Error;

/// Size of one capture record in bytes (a 112-bit Mode S slot).
pub const RECORD_SIZE: usize = 14;

/// All errors produced while decoding a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid record length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("unrecognized downlink format: {0}")]
    UnknownDf(u8),
    #[error("CRC validation failed for record {0}")]
    CrcFailed(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

// ---------------------------------------------------------------------------
// Downlink Format metadata
// ---------------------------------------------------------------------------

/// Metadata for a Downlink Format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfInfo {
    pub name: &'static str,
    pub bits: usize,
}

impl DfInfo {
    /// Number of bytes the frame occupies at the start of a record.
    pub fn bytes(&self) -> usize {
        self.bits / 8
    }
}

const fn df(name: &'static str, bits: usize) -> DfInfo {
    DfInfo { name, bits }
}

/// Known Downlink Format table.
pub const DF_TABLE: &[(u8, DfInfo)] = &[
    (0, df("Short air-air surveillance", 56)),
    (4, df("Surveillance altitude reply", 56)),
    (5, df("Surveillance identity reply", 56)),
    (11, df("All-call reply", 56)),
    (16, df("Long air-air surveillance", 112)),
    (17, df("ADS-B extended squitter", 112)),
    (18, df("TIS-B / ADS-R", 112)),
    (20, df("Comm-B altitude reply", 112)),
    (21, df("Comm-B identity reply", 112)),
];

/// Look up DF metadata. Returns `None` for unrecognized DFs.
pub fn df_info(df: u8) -> Option<&'static DfInfo> {
    DF_TABLE
        .iter()
        .find(|(d, _)| *d == df)
        .map(|(_, info)| info)
}

// ---------------------------------------------------------------------------
// ICAO address helpers
// ---------------------------------------------------------------------------

/// 3-byte ICAO address, the emitter identifier.
pub type Icao = [u8; 3];

/// Format ICAO address as 6-char uppercase hex string.
pub fn icao_to_string(icao: &Icao) -> String {
    hex_encode(icao)
}

/// Parse a 6-char hex string into an ICAO address.
pub fn icao_from_hex(hex: &str) -> Option<Icao> {
    if hex.len() != 6 {
        return None;
    }
    let val = u32::from_str_radix(hex, 16).ok()?;
    Some(icao_from_u32(val))
}

/// Build ICAO from a 24-bit integer.
pub fn icao_from_u32(val: u32) -> Icao {
    [
        ((val >> 16) & 0xFF) as u8,
        ((val >> 8) & 0xFF) as u8,
        (val & 0xFF) as u8,
    ]
}

/// Encode bytes as uppercase hex string.
pub fn hex_encode(data: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    s
}

/// ADS-B character set for callsign encoding (6 bits per character).
pub const CALLSIGN_CHARSET: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

// ---------------------------------------------------------------------------
// Decoded messages
// ---------------------------------------------------------------------------

/// ADS-B version announced by an emitter's operational status message.
///
/// Selects the surface position variant the emitter transmits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AdsbVersion {
    #[default]
    V0,
    V1,
    V2,
}

impl AdsbVersion {
    /// Map the 3-bit version field. Versions past 2 decode like V2.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => AdsbVersion::V0,
            1 => AdsbVersion::V1,
            _ => AdsbVersion::V2,
        }
    }
}

impl std::fmt::Display for AdsbVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdsbVersion::V0 => write!(f, "V0"),
            AdsbVersion::V1 => write!(f, "V1"),
            AdsbVersion::V2 => write!(f, "V2"),
        }
    }
}

/// Kind-specific payload of a decoded message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum MessageKind {
    /// TC 1-4: aircraft identification.
    Identification { callsign: String, category: u8 },
    /// TC 5-8: surface position with movement (ground speed).
    SurfacePosition {
        version: AdsbVersion,
        ground_speed_kts: Option<f64>,
        track_deg: Option<f64>,
        cpr_odd: bool,
        cpr_lat: u32,
        cpr_lon: u32,
    },
    /// TC 9-18 (barometric) and TC 20-22 (GNSS): airborne position.
    AirbornePosition {
        altitude_ft: Option<i32>,
        gnss: bool,
        cpr_odd: bool,
        cpr_lat: u32,
        cpr_lon: u32,
    },
    /// TC 19 subtype 1/2: velocity over ground.
    AirborneVelocity {
        ground_speed_kts: Option<f64>,
        track_deg: Option<f64>,
        vertical_rate_fpm: Option<i32>,
    },
    /// TC 19 subtype 3/4: airspeed and heading.
    AirspeedHeading {
        airspeed_kts: Option<u16>,
        true_airspeed: bool,
        heading_deg: Option<f64>,
        vertical_rate_fpm: Option<i32>,
    },
    /// TC 31: aircraft operational status.
    OperationalStatus { version: AdsbVersion },
    /// DF0/4/16/20: altitude reply.
    AltitudeReply { altitude_ft: Option<i32> },
    /// DF5/21: identity reply (squawk).
    IdentityReply { squawk: String },
    /// DF11: all-call reply.
    AllCall { capability: u8 },
    /// Any other extended squitter type code.
    ExtendedSquitter { type_code: u8 },
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(serialize_with = "serialize_icao")]
    pub icao: Icao,
    pub df: u8,
    pub timestamp: u64,
    #[serde(flatten)]
    pub kind: MessageKind,
}

impl Message {
    /// Emitter identifier as a 6-char hex string.
    pub fn address(&self) -> String {
        icao_to_string(&self.icao)
    }
}

fn serialize_icao<S: serde::Serializer>(icao: &Icao, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&icao_to_string(icao))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
