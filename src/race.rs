//! Negative-test fixture: unsynchronized concurrent min/max
//!
//! **Not a kernel.** This module reproduces the "wrong" benchmark variant:
//! the sequential update pattern (`max = max(max, x)`) run under a parallel
//! loop against *shared* accumulators with no reduction and no
//! synchronization. Each update is a separate load and store, so two workers
//! that read the same old value both write back their own candidate and one
//! of them is lost.
//!
//! The shared values are `AtomicU32` bit patterns accessed with `Relaxed`
//! loads and stores. That keeps the program free of undefined behaviour
//! while preserving the lost-update race the fixture exists to show: the
//! read-modify-write is *not* atomic.
//!
//! Use it only to demonstrate that the result can under-report extremes.
//! It is deliberately absent from [`crate::ReduceStrategy`].

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::reduce::{sequential_seeded, MinMax};

/// `f32` cell that only supports plain loads and stores
struct SharedF32(AtomicU32);

impl SharedF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Min/max with shared accumulators and a racy read-modify-write
///
/// The result is always some value from `data` (or the identity for empty
/// input) and never exceeds the true extremes, but under contention it can
/// miss them: `max` may come back smaller and `min` larger than the
/// reference.
pub fn unsynchronized_min_max(data: &[f32]) -> MinMax {
    let max = SharedF32::new(MinMax::IDENTITY.max);
    let min = SharedF32::new(MinMax::IDENTITY.min);

    data.par_iter().for_each(|&x| {
        // load ... store: another worker's store in between is overwritten
        let current = max.load();
        max.store(current.max(x));
        let current = min.load();
        min.store(current.min(x));
    });

    MinMax {
        min: min.load(),
        max: max.load(),
    }
}

/// Deterministic replay of one lost-update interleaving
///
/// Every worker reads the shared pair before any worker writes, reduces its
/// own range from that stale snapshot, then the workers store in `ranges`
/// order. The final value is whatever the last writer computed, so an
/// extreme that lives only in an earlier range is lost.
pub fn replay_lost_updates(data: &[f32], ranges: &[Range<usize>]) -> MinMax {
    let snapshot = MinMax::IDENTITY;
    let mut shared = snapshot;
    for range in ranges {
        shared = sequential_seeded(&data[range.clone()], snapshot);
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;
    use crate::reduce::sequential;

    #[test]
    fn test_unsynchronized_never_exceeds_true_extremes() {
        let data: Vec<f32> = (0..100_000).map(|i| ((i * 7919) % 10_007) as f32).collect();
        let reference = sequential(&data);
        for _ in 0..5 {
            let r = unsynchronized_min_max(&data);
            assert!(r.max <= reference.max);
            assert!(r.min >= reference.min);
            assert!(data.contains(&r.max));
            assert!(data.contains(&r.min));
        }
    }

    #[test]
    fn test_unsynchronized_single_element() {
        assert_eq!(unsynchronized_min_max(&[2.5]), MinMax::splat(2.5));
    }

    #[test]
    fn test_unsynchronized_empty_is_identity() {
        assert!(unsynchronized_min_max(&[]).is_identity());
    }

    #[test]
    fn test_replay_loses_extreme_from_earlier_range() {
        let mut data = vec![1.0f32; 16];
        data[0] = 99.0;
        data[5] = -99.0;
        let ranges = partition(data.len(), 4, 4);

        let replayed = replay_lost_updates(&data, &ranges);
        let reference = sequential(&data);

        assert_ne!(replayed, reference);
        assert_eq!(replayed, MinMax::splat(1.0));
    }

    #[test]
    fn test_replay_single_range_is_correct() {
        let data = [4.0f32, -1.0, 3.0];
        let replayed = replay_lost_updates(&data, &[0..3]);
        assert_eq!(replayed, sequential(&data));
    }

    /// Stress run showing divergence under real threads.
    ///
    /// Ignored by default: whether the race fires depends on core count and
    /// scheduling. Run with `cargo test -- --ignored` on a multi-core machine.
    #[test]
    #[ignore]
    fn test_unsynchronized_diverges_under_contention() {
        // Ascending data: every element is a new max, so every lost store shows
        let data: Vec<f32> = (0..4_000_000).map(|i| i as f32).collect();
        let reference = sequential(&data);

        let diverged = (0..50).any(|_| unsynchronized_min_max(&data) != reference);
        assert!(diverged, "no lost update observed in 50 runs");
    }
}
