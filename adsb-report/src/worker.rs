//! Decode one partition of the capture file.
//!
//! Runs on a blocking thread: one positional read of the partition, then a
//! sequential walk over whole 14-byte records with a decoder private to
//! this call. A trailing partial record is ignored.

use std::fs::File;
use std::io;

use adsb_core::{Message, StatefulDecoder, RECORD_SIZE};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::partition::Partition;

/// Read up to `buf.len()` bytes at `offset`. Stops early at end of file.
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = match positional_read(file, &mut buf[filled..], offset + filled as u64) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        filled += n;
    }
    Ok(filled)
}

#[cfg(unix)]
fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::read_at(file, buf, offset)
}

#[cfg(windows)]
fn positional_read(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::windows::fs::FileExt::seek_read(file, buf, offset)
}

/// Decode every whole record inside `partition`.
///
/// The file handle is shared read-only with sibling workers. The first
/// rejected record fails the whole partition.
pub fn decode_partition(file: &File, partition: Partition, timestamp: u64) -> Result<Vec<Message>> {
    let len = usize::try_from(partition.len).map_err(|_| PipelineError::PartitionRead {
        index: partition.index,
        source: io::Error::new(io::ErrorKind::InvalidInput, "partition too large to buffer"),
    })?;
    let mut buf = vec![0u8; len];
    let read = read_at(file, &mut buf, partition.start).map_err(|source| {
        PipelineError::PartitionRead {
            index: partition.index,
            source,
        }
    })?;
    if read == 0 {
        return Ok(Vec::new());
    }

    let mut decoder = StatefulDecoder::new();
    let mut messages = Vec::with_capacity(read / RECORD_SIZE);
    for (i, record) in buf[..read].chunks_exact(RECORD_SIZE).enumerate() {
        let msg = decoder
            .decode(record, timestamp)
            .map_err(|source| PipelineError::Decode {
                partition: partition.index,
                offset: partition.start + (i * RECORD_SIZE) as u64,
                source,
            })?;
        messages.push(msg);
    }

    let stats = decoder.stats();
    debug!(
        partition = partition.index,
        start = partition.start,
        bytes = read,
        messages = messages.len(),
        corrected = stats.corrected,
        ignored_tail = read % RECORD_SIZE,
        "Partition decoded"
    );
    Ok(messages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{airspeed, capture_file, identification, surface, ADDR};
    use adsb_core::{DecodeError, MessageKind};

    fn whole(len: u64) -> Partition {
        Partition { index: 0, start: 0, len }
    }

    #[test]
    fn test_decodes_records_in_order() {
        let (_dir, path) = capture_file(&[identification(ADDR, "TEST1"), airspeed(ADDR, 150)]);
        let file = File::open(&path).unwrap();
        let msgs = decode_partition(&file, whole(28), 1000).unwrap();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0].kind, MessageKind::Identification { .. }));
        assert!(matches!(msgs[1].kind, MessageKind::AirspeedHeading { .. }));
        assert!(msgs.iter().all(|m| m.timestamp == 1000));
    }

    #[test]
    fn test_partition_offset_is_respected() {
        let (_dir, path) = capture_file(&[identification(ADDR, "TEST1"), surface(ADDR, 33)]);
        let file = File::open(&path).unwrap();
        let part = Partition { index: 1, start: 14, len: 14 };
        let msgs = decode_partition(&file, part, 0).unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0].kind, MessageKind::SurfacePosition { .. }));
    }

    #[test]
    fn test_trailing_partial_record_is_ignored() {
        let (_dir, path) = capture_file(&[identification(ADDR, "TEST1"), airspeed(ADDR, 150)]);
        let file = File::open(&path).unwrap();
        let msgs = decode_partition(&file, whole(20), 0).unwrap();
        assert_eq!(msgs.len(), 1);
    }

    #[test]
    fn test_read_past_end_of_file_is_empty() {
        let (_dir, path) = capture_file(&[identification(ADDR, "TEST1")]);
        let file = File::open(&path).unwrap();
        let part = Partition { index: 2, start: 140, len: 14 };
        assert!(decode_partition(&file, part, 0).unwrap().is_empty());
    }

    #[test]
    fn test_rejected_record_fails_partition_with_offset() {
        let mut bad = [0u8; 14];
        bad[0] = 0xF8;
        let (_dir, path) = capture_file(&[identification(ADDR, "TEST1"), bad]);
        let file = File::open(&path).unwrap();
        let part = Partition { index: 3, start: 0, len: 28 };
        match decode_partition(&file, part, 0).unwrap_err() {
            PipelineError::Decode {
                partition,
                offset,
                source,
            } => {
                assert_eq!(partition, 3);
                assert_eq!(offset, 14);
                assert_eq!(source, DecodeError::UnknownDf(31));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
