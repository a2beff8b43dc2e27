//! CRC-24 validation and error correction for Mode S frames.
//!
//! ICAO standard polynomial, generator 0xFFF409.
//!
//! For DF17/18 (ADS-B) the last 24 bits are pure parity: valid frames leave
//! a remainder of 0. For DF0/4/5/16/20/21 the parity is XOR'd with the ICAO
//! address, so the remainder *is* the address.

use std::collections::HashMap;
use std::sync::LazyLock;

const GENERATOR: u32 = 0xFFF409;

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 16;
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x800000 != 0 {
                crc = (crc << 1) ^ GENERATOR;
            } else {
                crc <<= 1;
            }
            crc &= 0xFFFFFF;
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = build_crc_table();

fn divide(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |crc, &byte| {
        ((crc << 8) ^ CRC_TABLE[((crc >> 16) ^ byte as u32) as usize & 0xFF]) & 0xFFFFFF
    })
}

/// Mode S CRC-24 remainder of a whole frame.
///
/// Divides the payload (all but the last 3 bytes) and XORs the result with
/// the parity field.
pub fn crc24(frame: &[u8]) -> u32 {
    if frame.len() <= 3 {
        return frame.iter().fold(0u32, |v, &b| (v << 8) | b as u32) & 0xFFFFFF;
    }
    let n = frame.len() - 3;
    divide(&frame[..n])
        ^ ((frame[n] as u32) << 16 | (frame[n + 1] as u32) << 8 | frame[n + 2] as u32)
}

/// CRC-24 of the payload bytes only (all except the last 3).
pub fn crc24_payload(frame: &[u8]) -> u32 {
    if frame.len() <= 3 {
        return 0;
    }
    divide(&frame[..frame.len() - 3])
}

/// Overwrite the parity field so that `crc24(frame) == 0`.
pub fn seal(frame: &mut [u8]) {
    if frame.len() <= 3 {
        return;
    }
    let parity = crc24_payload(frame);
    let n = frame.len() - 3;
    frame[n] = (parity >> 16) as u8;
    frame[n + 1] = (parity >> 8) as u8;
    frame[n + 2] = parity as u8;
}

// ---------------------------------------------------------------------------
// Syndrome tables for error correction
// ---------------------------------------------------------------------------

fn build_syndrome_table(n_bits: usize) -> HashMap<u32, Vec<usize>> {
    let n_bytes = n_bits / 8;
    let mut table = HashMap::new();
    let flip = |msg: &mut [u8], bit: usize| msg[bit / 8] |= 1 << (7 - (bit % 8));

    for bit1 in 0..n_bits {
        let mut msg = vec![0u8; n_bytes];
        flip(&mut msg, bit1);
        table.entry(crc24(&msg)).or_insert_with(|| vec![bit1]);
    }
    for bit1 in 0..n_bits {
        for bit2 in (bit1 + 1)..n_bits {
            let mut msg = vec![0u8; n_bytes];
            flip(&mut msg, bit1);
            flip(&mut msg, bit2);
            table.entry(crc24(&msg)).or_insert_with(|| vec![bit1, bit2]);
        }
    }
    table
}

static SYNDROME_TABLE_112: LazyLock<HashMap<u32, Vec<usize>>> =
    LazyLock::new(|| build_syndrome_table(112));
static SYNDROME_TABLE_56: LazyLock<HashMap<u32, Vec<usize>>> =
    LazyLock::new(|| build_syndrome_table(56));

/// Attempt to correct 1-2 bit errors in a Mode S frame.
///
/// Never flips bits 0-4 (the DF field), so a correction cannot turn one
/// message type into another. Returns the corrected frame, or `None` when
/// the syndrome is unknown or the fix does not validate.
pub fn try_fix(frame: &[u8]) -> Option<Vec<u8>> {
    let syndrome = crc24(frame);
    if syndrome == 0 {
        return Some(frame.to_vec());
    }

    let table = match frame.len() * 8 {
        112 => &*SYNDROME_TABLE_112,
        56 => &*SYNDROME_TABLE_56,
        _ => return None,
    };
    let bits = table.get(&syndrome)?;
    if bits.iter().any(|&b| b < 5) {
        return None;
    }

    let mut fixed = frame.to_vec();
    for &bit in bits {
        fixed[bit / 8] ^= 1 << (7 - (bit % 8));
    }
    (crc24(&fixed) == 0).then_some(fixed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const KLM_IDENT: [u8; 14] = [
        0x8D, 0x48, 0x40, 0xD6, 0x20, 0x2C, 0xC3, 0x71, 0xC3, 0x2C, 0xE0, 0x57, 0x60, 0x98,
    ];
    const VELOCITY: [u8; 14] = [
        0x8D, 0x48, 0x50, 0x20, 0x99, 0x44, 0x09, 0x94, 0x08, 0x38, 0x17, 0x5B, 0x28, 0x4F,
    ];

    #[test]
    fn test_crc_table_entry_zero() {
        assert_eq!(CRC_TABLE[0], 0);
        assert_ne!(CRC_TABLE[1], 0);
    }

    #[test]
    fn test_valid_df17_remainder_zero() {
        assert_eq!(crc24(&KLM_IDENT), 0);
        assert_eq!(crc24(&VELOCITY), 0);
    }

    #[test]
    fn test_payload_crc_matches_parity() {
        let pi = (KLM_IDENT[11] as u32) << 16 | (KLM_IDENT[12] as u32) << 8 | KLM_IDENT[13] as u32;
        assert_eq!(crc24_payload(&KLM_IDENT), pi);
    }

    #[test]
    fn test_seal_restores_parity() {
        let mut frame = KLM_IDENT;
        frame[11..].fill(0);
        assert_ne!(crc24(&frame), 0);
        seal(&mut frame);
        assert_eq!(frame, KLM_IDENT);
    }

    #[test]
    fn test_try_fix_already_valid() {
        assert_eq!(try_fix(&KLM_IDENT).unwrap(), KLM_IDENT.to_vec());
    }

    #[test]
    fn test_try_fix_single_bit_error() {
        let mut frame = KLM_IDENT;
        frame[5] ^= 0x01;
        assert_ne!(crc24(&frame), 0);
        assert_eq!(try_fix(&frame).unwrap(), KLM_IDENT.to_vec());
    }

    #[test]
    fn test_try_fix_two_bit_error() {
        let mut frame = VELOCITY;
        frame[6] ^= 0x10;
        frame[9] ^= 0x02;
        assert_eq!(try_fix(&frame).unwrap(), VELOCITY.to_vec());
    }

    #[test]
    fn test_try_fix_refuses_df_field() {
        let mut frame = KLM_IDENT;
        frame[0] ^= 0x80;
        assert!(try_fix(&frame).is_none());
    }

    #[test]
    fn test_try_fix_rejects_odd_lengths() {
        assert!(try_fix(&KLM_IDENT[..10]).is_none());
    }
}
