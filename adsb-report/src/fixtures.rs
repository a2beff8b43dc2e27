//! Record builders for tests: encode ME fields and seal CRC parity.

use std::path::PathBuf;

use adsb_core::{crc, Icao, RECORD_SIZE};
use tempfile::TempDir;

pub const ADDR: Icao = [0xAB, 0xC1, 0x23];

pub fn squitter(icao: Icao, me: u64) -> [u8; RECORD_SIZE] {
    let mut raw = [0u8; RECORD_SIZE];
    raw[0] = 0x8D;
    raw[1..4].copy_from_slice(&icao);
    raw[4..11].copy_from_slice(&me.to_be_bytes()[1..]);
    crc::seal(&mut raw);
    raw
}

/// TC 4 identification; `callsign` is space-padded to 8 characters.
pub fn identification(icao: Icao, callsign: &str) -> [u8; RECORD_SIZE] {
    let mut me = 4u64 << 51;
    let padded = format!("{callsign:<8}");
    for (i, c) in padded.bytes().take(8).enumerate() {
        let code = match c {
            b'A'..=b'Z' => c - b'A' + 1,
            b'0'..=b'9' => c - b'0' + 48,
            _ => 32,
        };
        me |= (code as u64) << (42 - i * 6);
    }
    squitter(icao, me)
}

/// TC 19 subtype 3 with indicated airspeed `kts`.
pub fn airspeed(icao: Icao, kts: u64) -> [u8; RECORD_SIZE] {
    squitter(icao, (19 << 51) | (3 << 48) | ((kts + 1) << 21))
}

/// TC 6 surface position with raw movement code `movement`.
pub fn surface(icao: Icao, movement: u64) -> [u8; RECORD_SIZE] {
    squitter(icao, (6 << 51) | (movement << 44))
}

/// Write `records` back to back into a scratch capture file.
pub fn capture_file(records: &[[u8; RECORD_SIZE]]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.bin");
    std::fs::write(&path, records.concat()).unwrap();
    (dir, path)
}
