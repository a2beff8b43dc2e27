//! Split a capture file into byte ranges for parallel decoding.
//!
//! `plan` is the plain even split: every partition gets `size / workers`
//! bytes and the last one absorbs the remainder. Boundaries are NOT
//! record-aligned, so when `size / workers` is not a multiple of the record
//! size a record can straddle two partitions and be lost or misread.
//! `plan_aligned` cuts on record boundaries instead.

/// A contiguous byte range of the input, decoded by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub start: u64,
    pub len: u64,
}

impl Partition {
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Even byte split into exactly `workers` partitions.
///
/// `workers` must be at least 1.
pub fn plan(file_size: u64, workers: usize) -> Vec<Partition> {
    split(file_size, workers, file_size / workers.max(1) as u64)
}

/// Record-aligned split into exactly `workers` partitions.
///
/// Every internal boundary is a multiple of `record_size`; only the last
/// partition may end on a partial record.
pub fn plan_aligned(file_size: u64, workers: usize, record_size: usize) -> Vec<Partition> {
    let record = record_size.max(1) as u64;
    let base = file_size / record / workers.max(1) as u64 * record;
    split(file_size, workers, base)
}

fn split(file_size: u64, workers: usize, base: u64) -> Vec<Partition> {
    let workers = workers.max(1);
    (0..workers)
        .map(|index| {
            let start = index as u64 * base;
            let end = if index == workers - 1 {
                file_size
            } else {
                start + base
            };
            Partition {
                index,
                start,
                len: end - start,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exhaustive(parts: &[Partition], file_size: u64) {
        assert_eq!(parts.first().map(|p| p.start), Some(0));
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start, "gap or overlap: {pair:?}");
        }
        assert_eq!(parts.iter().map(|p| p.len).sum::<u64>(), file_size);
        for (i, p) in parts.iter().enumerate() {
            assert_eq!(p.index, i);
        }
    }

    #[test]
    fn test_plan_covers_file_for_many_sizes() {
        for file_size in [0u64, 1, 13, 14, 42, 100, 1_000, 14 * 1_000 + 5] {
            for workers in 1..=7 {
                let parts = plan(file_size, workers);
                assert_eq!(parts.len(), workers);
                assert_exhaustive(&parts, file_size);
            }
        }
    }

    #[test]
    fn test_plan_last_partition_absorbs_remainder() {
        let parts = plan(100, 3);
        assert_eq!(
            parts.iter().map(|p| (p.start, p.len)).collect::<Vec<_>>(),
            vec![(0, 33), (33, 33), (66, 34)]
        );
    }

    #[test]
    fn test_plan_even_split_may_cut_records() {
        // 4 records over 3 workers: base 18 is not a multiple of 14.
        let parts = plan(56, 3);
        assert_eq!(parts[1].start, 18);
        assert_ne!(parts[1].start % 14, 0);
    }

    #[test]
    fn test_plan_small_file_gives_empty_leading_partitions() {
        let parts = plan(2, 3);
        assert_eq!(parts[0].len, 0);
        assert_eq!(parts[1].len, 0);
        assert_eq!(parts[2], Partition { index: 2, start: 0, len: 2 });
    }

    #[test]
    fn test_plan_aligned_boundaries_are_record_multiples() {
        for file_size in [0u64, 14, 56, 140, 14 * 37 + 9] {
            for workers in 1..=6 {
                let parts = plan_aligned(file_size, workers, 14);
                assert_eq!(parts.len(), workers);
                assert_exhaustive(&parts, file_size);
                for p in &parts[..workers - 1] {
                    assert_eq!(p.len % 14, 0, "{p:?}");
                }
            }
        }
    }

    #[test]
    fn test_plan_aligned_four_records_three_workers() {
        let parts = plan_aligned(56, 3, 14);
        assert_eq!(
            parts.iter().map(|p| (p.start, p.len)).collect::<Vec<_>>(),
            vec![(0, 14), (14, 14), (28, 28)]
        );
    }
}
