//! Index-range partitioning for fork-join kernels
//!
//! Parallel kernels split `[0, len)` into contiguous, disjoint chunks, hand
//! each chunk to its own task, and merge what the tasks return. Chunk
//! boundaries fall on multiples of `align` so a vectorized task never starts
//! mid lane-group; only the final chunk may carry a partial group.

use std::ops::Range;

/// Split `[0, len)` into at most `parts` contiguous ranges
///
/// Guarantees:
/// - ranges are non-empty, disjoint, ascending and cover `[0, len)` exactly
/// - every range starts on a multiple of `align`
/// - sizes differ by at most one `align` group, except the last range which
///   also holds the `len % align` remainder
///
/// `parts == 0` and `align == 0` are treated as 1.
///
/// # Examples
///
/// ```
/// use lanework::partition::partition;
///
/// assert_eq!(partition(10, 2, 4), vec![0..4, 4..10]);
/// assert_eq!(partition(0, 8, 4), vec![]);
/// ```
pub fn partition(len: usize, parts: usize, align: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let align = align.max(1);

    if len == 0 {
        return Vec::new();
    }

    let groups = len / align;
    if groups == 0 {
        return vec![0..len];
    }

    let parts = parts.min(groups);
    let base = groups / parts;
    let extra = groups % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for p in 0..parts {
        let size = (base + usize::from(p < extra)) * align;
        let end = if p + 1 == parts { len } else { start + size };
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Lane-aligned chunk length that spreads `len` over `parts` workers
///
/// Used with `par_chunks`: returns a multiple of `align`, at least `align`.
pub fn chunk_len(len: usize, parts: usize, align: usize) -> usize {
    let parts = parts.max(1);
    let align = align.max(1);
    len.div_ceil(parts).div_ceil(align).max(1) * align
}

/// Number of partitions to use on the current rayon pool
///
/// Inside `ThreadPool::install` this is the pool's size, otherwise the
/// global pool's (which honours `RAYON_NUM_THREADS`).
pub fn default_parts() -> usize {
    rayon::current_num_threads()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(len: usize, parts: usize, align: usize) {
        let ranges = partition(len, parts, align);
        let mut expected_start = 0;
        for r in &ranges {
            assert_eq!(r.start, expected_start, "gap or overlap at {r:?}");
            assert!(r.end > r.start, "empty range {r:?}");
            assert_eq!(r.start % align.max(1), 0, "unaligned start {r:?}");
            expected_start = r.end;
        }
        assert_eq!(expected_start, len);
        assert!(ranges.len() <= parts.max(1));
    }

    #[test]
    fn test_partition_even_split() {
        assert_eq!(partition(16, 4, 4), vec![0..4, 4..8, 8..12, 12..16]);
    }

    #[test]
    fn test_partition_remainder_in_last_range() {
        assert_eq!(partition(18, 2, 4), vec![0..8, 8..18]);
    }

    #[test]
    fn test_partition_uneven_groups() {
        // 5 groups over 3 parts: 2, 2, 1
        assert_eq!(partition(20, 3, 4), vec![0..8, 8..16, 16..20]);
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(0, 4, 4).is_empty());
    }

    #[test]
    fn test_partition_shorter_than_lane() {
        assert_eq!(partition(3, 8, 4), vec![0..3]);
    }

    #[test]
    fn test_partition_more_parts_than_groups() {
        assert_eq!(partition(9, 16, 4), vec![0..4, 4..9]);
    }

    #[test]
    fn test_partition_zero_parts_and_align() {
        assert_eq!(partition(5, 0, 0), vec![0..5]);
    }

    #[test]
    fn test_partition_invariants_grid() {
        for len in 0..70 {
            for parts in 0..9 {
                for align in [1, 4] {
                    assert_valid(len, parts, align);
                }
            }
        }
    }

    #[test]
    fn test_chunk_len() {
        assert_eq!(chunk_len(100, 4, 4), 28);
        assert_eq!(chunk_len(3, 4, 4), 4);
        assert_eq!(chunk_len(0, 4, 4), 4);
        assert_eq!(chunk_len(16, 4, 4), 4);
    }

    #[test]
    fn test_default_parts_positive() {
        assert!(default_parts() >= 1);
    }
}
