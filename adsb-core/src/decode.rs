//! Decode Mode S frames into typed message payloads.
//!
//! - DF17/18 TC 1-4:   aircraft identification (callsign)
//! - DF17/18 TC 5-8:   surface position (movement + ground track)
//! - DF17/18 TC 9-18:  airborne position (barometric altitude)
//! - DF17/18 TC 19:    airborne velocity / airspeed + heading
//! - DF17/18 TC 20-22: airborne position (GNSS altitude)
//! - DF17/18 TC 31:    operational status (ADS-B version)
//! - DF0/4/16/20:      altitude reply
//! - DF5/21:           identity reply (squawk)
//! - DF11:             all-call reply

use crate::frame::ModeFrame;
use crate::types::{AdsbVersion, MessageKind, CALLSIGN_CHARSET};

// ---------------------------------------------------------------------------
// Altitude decoding
// ---------------------------------------------------------------------------

/// Decode the 12-bit altitude field of an airborne position.
///
/// Q=1 selects 25-ft resolution, Q=0 the 100-ft Gillham gray code.
pub fn decode_altitude(alt_code: u32) -> Option<i32> {
    if alt_code == 0 {
        return None;
    }
    if (alt_code >> 4) & 1 == 1 {
        let n = ((alt_code >> 5) << 4) | (alt_code & 0x0F);
        Some(n as i32 * 25 - 1000)
    } else {
        decode_gillham_altitude(alt_code)
    }
}

/// Decode the 13-bit altitude field of DF0/4/16/20 replies.
///
/// M=1 (metric) is not decoded.
pub fn decode_altitude_13bit(alt_code: u32) -> Option<i32> {
    if alt_code == 0 || (alt_code >> 6) & 1 == 1 {
        return None;
    }
    if (alt_code >> 4) & 1 == 1 {
        let n = ((alt_code & 0x1F80) >> 2) | ((alt_code & 0x0020) >> 1) | (alt_code & 0x000F);
        Some(n as i32 * 25 - 1000)
    } else {
        decode_gillham_altitude(alt_code)
    }
}

fn decode_gillham_altitude(alt_code: u32) -> Option<i32> {
    let bit = |n: u32| (alt_code >> n) & 1;
    let (c1, a1, c2, a2, c4, a4) = (bit(12), bit(11), bit(10), bit(9), bit(8), bit(7));
    let (b1, b2, b4) = (bit(5), bit(3), bit(1));

    let mut c_bin = c4 * 4 + c2 * 2 + c1;
    c_bin ^= c_bin >> 2;
    c_bin ^= c_bin >> 1;
    if c_bin == 0 || c_bin >= 6 {
        return None;
    }

    let mut ab_bin = (a4 * 4 + a2 * 2 + a1) << 3 | (b4 * 4 + b2 * 2 + b1);
    ab_bin ^= ab_bin >> 4;
    ab_bin ^= ab_bin >> 2;
    ab_bin ^= ab_bin >> 1;

    let altitude = ab_bin as i32 * 500 + c_bin as i32 * 100 - 1200;
    (-1200..=126750).contains(&altitude).then_some(altitude)
}

/// Decode a 13-bit identity field into a 4-digit octal squawk.
///
/// Bit layout: C1 A1 C2 A2 C4 A4 _ B1 D1 B2 D2 B4 D4
pub fn decode_squawk(id_code: u32) -> String {
    let bit = |n: u32| (id_code >> n) & 1;
    let a = bit(7) * 4 + bit(9) * 2 + bit(11);
    let b = bit(1) * 4 + bit(3) * 2 + bit(5);
    let c = bit(8) * 4 + bit(10) * 2 + bit(12);
    let d = bit(0) * 4 + bit(2) * 2 + bit(4);
    format!("{a}{b}{c}{d}")
}

/// Decode the 7-bit surface movement field into knots.
pub fn decode_movement(mov: u8) -> Option<f64> {
    let m = mov as f64;
    match mov {
        1 => Some(0.0),
        2..=8 => Some((m - 1.0) * 0.125),
        9..=12 => Some(1.0 + (m - 9.0) * 0.25),
        13..=38 => Some(2.0 + (m - 13.0) * 0.5),
        39..=93 => Some(15.0 + (m - 39.0)),
        94..=108 => Some(70.0 + (m - 94.0) * 2.0),
        109..=123 => Some(100.0 + (m - 109.0) * 5.0),
        124 => Some(175.0),
        _ => None,
    }
}

fn vertical_rate(bits: u64) -> Option<i32> {
    let sign = (bits >> 19) & 1;
    let val = ((bits >> 10) & 0x1FF) as i32 - 1;
    (val >= 0).then(|| if sign == 1 { -val * 64 } else { val * 64 })
}

// ---------------------------------------------------------------------------
// Extended squitter payloads
// ---------------------------------------------------------------------------

/// TC 1-4: eight 6-bit characters after the emitter category.
pub fn decode_identification(bits: u64) -> MessageKind {
    let callsign = (0..8)
        .map(|i| CALLSIGN_CHARSET[((bits >> (42 - i * 6)) & 0x3F) as usize] as char)
        .collect();
    MessageKind::Identification {
        callsign,
        category: ((bits >> 48) & 0x07) as u8,
    }
}

/// TC 5-8: surface position. `version` comes from the emitter's last
/// operational status.
pub fn decode_surface_position(bits: u64, version: AdsbVersion) -> MessageKind {
    let track_valid = (bits >> 43) & 1 == 1;
    let track = ((bits >> 36) & 0x7F) as f64;
    MessageKind::SurfacePosition {
        version,
        ground_speed_kts: decode_movement(((bits >> 44) & 0x7F) as u8),
        track_deg: track_valid.then(|| round2(track * 360.0 / 128.0)),
        cpr_odd: (bits >> 34) & 1 == 1,
        cpr_lat: ((bits >> 17) & 0x1FFFF) as u32,
        cpr_lon: (bits & 0x1FFFF) as u32,
    }
}

/// TC 9-18 and 20-22: airborne position.
pub fn decode_airborne_position(bits: u64, gnss: bool) -> MessageKind {
    MessageKind::AirbornePosition {
        altitude_ft: decode_altitude(((bits >> 36) & 0x0FFF) as u32),
        gnss,
        cpr_odd: (bits >> 34) & 1 == 1,
        cpr_lat: ((bits >> 17) & 0x1FFFF) as u32,
        cpr_lon: (bits & 0x1FFFF) as u32,
    }
}

/// TC 19: airborne velocity. Subtypes 1/2 carry velocity over ground,
/// 3/4 airspeed and heading; the even subtypes are supersonic (x4).
/// Reserved subtypes fall back to a bare extended squitter.
pub fn decode_velocity(bits: u64) -> MessageKind {
    let subtype = ((bits >> 48) & 0x07) as u8;
    let scale = if subtype == 2 || subtype == 4 { 4 } else { 1 };

    match subtype {
        1 | 2 => {
            let ew_west = (bits >> 42) & 1 == 1;
            let ew = ((bits >> 32) & 0x3FF) as i32 - 1;
            let ns_south = (bits >> 31) & 1 == 1;
            let ns = ((bits >> 21) & 0x3FF) as i32 - 1;

            let (speed, track) = if ew >= 0 && ns >= 0 {
                let vx = (scale * if ew_west { -ew } else { ew }) as f64;
                let vy = (scale * if ns_south { -ns } else { ns }) as f64;
                let track = vx.atan2(vy).to_degrees().rem_euclid(360.0);
                (Some(round2(vx.hypot(vy))), Some(round2(track)))
            } else {
                (None, None)
            };

            MessageKind::AirborneVelocity {
                ground_speed_kts: speed,
                track_deg: track,
                vertical_rate_fpm: vertical_rate(bits),
            }
        }
        3 | 4 => {
            let heading_valid = (bits >> 42) & 1 == 1;
            let heading = ((bits >> 32) & 0x3FF) as f64;
            let raw = ((bits >> 21) & 0x3FF) as u16;

            MessageKind::AirspeedHeading {
                airspeed_kts: (raw > 0).then(|| (raw - 1) * scale as u16),
                true_airspeed: (bits >> 31) & 1 == 1,
                heading_deg: heading_valid.then(|| round2(heading * 360.0 / 1024.0)),
                vertical_rate_fpm: vertical_rate(bits),
            }
        }
        _ => MessageKind::ExtendedSquitter { type_code: 19 },
    }
}

/// TC 31 subtype 0/1: operational status. Other subtypes are reserved.
pub fn decode_operational_status(bits: u64) -> MessageKind {
    let subtype = (bits >> 48) & 0x07;
    if subtype > 1 {
        return MessageKind::ExtendedSquitter { type_code: 31 };
    }
    MessageKind::OperationalStatus {
        version: AdsbVersion::from_bits(((bits >> 13) & 0x07) as u8),
    }
}

/// Decode any parsed frame into its payload.
///
/// `version` selects the surface position variant for this emitter.
pub fn decode_frame(frame: &ModeFrame, version: AdsbVersion) -> MessageKind {
    let raw = &frame.raw;
    let field13 = ((raw[2] as u32 & 0x1F) << 8) | raw[3] as u32;

    match frame.df {
        17 | 18 => {
            let bits = frame.me_bits();
            match frame.type_code().unwrap_or(0) {
                1..=4 => decode_identification(bits),
                5..=8 => decode_surface_position(bits, version),
                9..=18 => decode_airborne_position(bits, false),
                19 => decode_velocity(bits),
                20..=22 => decode_airborne_position(bits, true),
                31 => decode_operational_status(bits),
                tc => MessageKind::ExtendedSquitter { type_code: tc },
            }
        }
        5 | 21 => MessageKind::IdentityReply {
            squawk: decode_squawk(field13),
        },
        11 => MessageKind::AllCall {
            capability: raw[0] & 0x07,
        },
        _ => MessageKind::AltitudeReply {
            altitude_ft: decode_altitude_13bit(field13),
        },
    }
}

/// Round to 2 decimal places.
fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
