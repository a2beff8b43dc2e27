//! Classify raw 14-byte records into structured Mode S frames.
//!
//! Responsibilities:
//! - Classify Downlink Format (DF) from the first 5 bits
//! - Trim 56-bit formats to the first 7 bytes of the record slot
//! - Extract ICAO address (bytes 1-3 for DF11/17/18, or from CRC residual)
//! - Reject DF17/18 frames that fail CRC after 1-2 bit correction

use crate::crc;
use crate::types::{df_info, hex_encode, DecodeError, Icao, Result, RECORD_SIZE};

// DFs where ICAO is recovered from CRC residual
const DF_RESIDUAL_ICAO: &[u8] = &[0, 4, 5, 16, 20, 21];

/// A parsed Mode S frame.
#[derive(Debug, Clone)]
pub struct ModeFrame {
    /// Downlink Format (0-24)
    pub df: u8,
    /// 3-byte ICAO address
    pub icao: Icao,
    /// Frame bytes (7 or 14), padding stripped
    pub raw: Vec<u8>,
    /// True if error correction was applied
    pub corrected: bool,
}

impl ModeFrame {
    /// Human-readable Downlink Format name.
    pub fn df_name(&self) -> &'static str {
        df_info(self.df).map(|info| info.name).unwrap_or("Unknown")
    }

    /// True if this is a 112-bit (long) frame.
    pub fn is_long(&self) -> bool {
        self.raw.len() == 14
    }

    /// Message Extended field (bytes 4-10) packed into the low 56 bits.
    /// Zero for short frames.
    pub fn me_bits(&self) -> u64 {
        if !self.is_long() {
            return 0;
        }
        let mut buf = [0u8; 8];
        buf[1..8].copy_from_slice(&self.raw[4..11]);
        u64::from_be_bytes(buf)
    }

    /// ADS-B Type Code (first 5 bits of ME). None outside DF17/18.
    pub fn type_code(&self) -> Option<u8> {
        if !matches!(self.df, 17 | 18) || !self.is_long() {
            return None;
        }
        Some((self.raw[4] >> 3) & 0x1F)
    }
}

/// Parse one record into a ModeFrame.
pub fn parse_record(record: &[u8]) -> Result<ModeFrame> {
    if record.len() != RECORD_SIZE {
        return Err(DecodeError::InvalidLength {
            expected: RECORD_SIZE,
            actual: record.len(),
        });
    }

    let df = (record[0] >> 3) & 0x1F;
    let info = df_info(df).ok_or(DecodeError::UnknownDf(df))?;
    let mut raw = record[..info.bytes()].to_vec();
    let mut corrected = false;

    let icao = match df {
        17 | 18 => {
            if crc::crc24(&raw) != 0 {
                raw = crc::try_fix(&raw).ok_or_else(|| DecodeError::CrcFailed(hex_encode(record)))?;
                corrected = true;
            }
            [raw[1], raw[2], raw[3]]
        }
        11 => [raw[1], raw[2], raw[3]],
        _ if DF_RESIDUAL_ICAO.contains(&df) => {
            let residual = crc::crc24(&raw);
            [
                ((residual >> 16) & 0xFF) as u8,
                ((residual >> 8) & 0xFF) as u8,
                (residual & 0xFF) as u8,
            ]
        }
        _ => return Err(DecodeError::UnknownDf(df)),
    };

    Ok(ModeFrame {
        df,
        icao,
        raw,
        corrected,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::icao_to_string;

    const KLM_IDENT: [u8; 14] = [
        0x8D, 0x48, 0x40, 0xD6, 0x20, 0x2C, 0xC3, 0x71, 0xC3, 0x2C, 0xE0, 0x57, 0x60, 0x98,
    ];

    #[test]
    fn test_parse_df17_identification() {
        let frame = parse_record(&KLM_IDENT).unwrap();
        assert_eq!(frame.df, 17);
        assert_eq!(icao_to_string(&frame.icao), "4840D6");
        assert!(frame.is_long());
        assert!(!frame.corrected);
        assert_eq!(frame.df_name(), "ADS-B extended squitter");
        let tc = frame.type_code().unwrap();
        assert!((1..=4).contains(&tc), "TC={tc} should be identification");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = parse_record(&KLM_IDENT[..7]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidLength {
                expected: 14,
                actual: 7
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_df() {
        let mut record = [0u8; 14];
        record[0] = 31 << 3;
        assert_eq!(parse_record(&record).unwrap_err(), DecodeError::UnknownDf(31));
    }

    #[test]
    fn test_parse_rejects_uncorrectable_crc() {
        let mut record = [0u8; 14];
        record[0] = 0x8D;
        assert!(matches!(
            parse_record(&record).unwrap_err(),
            DecodeError::CrcFailed(_)
        ));
    }

    #[test]
    fn test_parse_corrects_single_bit() {
        let mut record = KLM_IDENT;
        record[5] ^= 0x01;
        let frame = parse_record(&record).unwrap();
        assert!(frame.corrected);
        assert_eq!(frame.raw, KLM_IDENT.to_vec());
    }

    #[test]
    fn test_short_frame_ignores_padding() {
        // DF11 all-call in the first 7 bytes, junk after.
        let mut record = [0xFFu8; 14];
        record[..7].copy_from_slice(&[0x5D, 0x48, 0x40, 0xD6, 0x00, 0x00, 0x00]);
        let frame = parse_record(&record).unwrap();
        assert_eq!(frame.df, 11);
        assert_eq!(frame.raw.len(), 7);
        assert_eq!(icao_to_string(&frame.icao), "4840D6");
        assert_eq!(frame.type_code(), None);
        assert_eq!(frame.me_bits(), 0);
    }

    #[test]
    fn test_residual_icao_recovery() {
        // Seal a DF4 frame, then XOR the address into the parity.
        let mut raw = [0x20, 0x00, 0x0C, 0x38, 0, 0, 0];
        crc::seal(&mut raw);
        raw[4] ^= 0xAB;
        raw[5] ^= 0xC1;
        raw[6] ^= 0x23;
        let mut record = [0u8; 14];
        record[..7].copy_from_slice(&raw);
        let frame = parse_record(&record).unwrap();
        assert_eq!(frame.df, 4);
        assert_eq!(icao_to_string(&frame.icao), "ABC123");
    }
}
