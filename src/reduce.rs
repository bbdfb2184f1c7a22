//! Min/max reduction kernels
//!
//! All strategies return a [`MinMax`] equal to the sequential reference for
//! finite, NaN-free input. They differ only in how the work is split:
//!
//! - [`ReduceStrategy::Sequential`]: one running pair, one element per step
//! - [`ReduceStrategy::Vectorized`]: per-lane accumulators, horizontal reduction, scalar tail
//! - [`ReduceStrategy::ParallelReduce`]: rayon `fold` + `reduce`, min and max fused in one pass
//! - [`ReduceStrategy::ParallelTwoPass`]: rayon reduction, one pass for max and one for min
//! - [`ReduceStrategy::Partitioned`]: explicit chunks, task-local `MinMax`, sequential merge
//! - [`ReduceStrategy::PartitionedVectorized`]: explicit lane-aligned chunks, task-local lane
//!   accumulators
//!
//! Raw kernels accept empty slices and return [`MinMax::IDENTITY`] without
//! reading memory. [`crate::Kernels::min_max`] rejects empty input instead.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::backends::LaneVector;
use crate::partition;

/// Running minimum and maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMax {
    /// Smallest value seen
    pub min: f32,
    /// Largest value seen
    pub max: f32,
}

impl MinMax {
    /// Identity for [`MinMax::merge`]: merging with it changes nothing
    pub const IDENTITY: MinMax = MinMax {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Seed used by the C benchmarks (`max = FLT_MIN`, `min = FLT_MAX`)
    ///
    /// `FLT_MIN` is the smallest *positive* normal float, not the most
    /// negative one, so any input whose elements are all `<= 0` reports
    /// `max == f32::MIN_POSITIVE`. Kept only so the defect can be reproduced
    /// with [`sequential_seeded`].
    pub const FLT_MIN_SEED: MinMax = MinMax {
        min: f32::MAX,
        max: f32::MIN_POSITIVE,
    };

    /// Pair holding a single value
    pub fn splat(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Fold one element in
    #[inline(always)]
    #[must_use]
    pub fn update(self, value: f32) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Combine two partial results (associative and commutative)
    #[inline(always)]
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when nothing has been folded in yet
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for MinMax {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromIterator<f32> for MinMax {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        iter.into_iter().fold(Self::IDENTITY, MinMax::update)
    }
}

/// Implementation strategy for the min/max reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReduceStrategy {
    /// Single running pair
    Sequential,
    /// 4-lane accumulators with horizontal reduction
    Vectorized,
    /// Built-in parallel reduction, both extremes in one pass
    ParallelReduce,
    /// Built-in parallel reduction, one pass per extreme
    ParallelTwoPass,
    /// Explicit partitions with task-local scalar accumulators
    Partitioned,
    /// Explicit partitions with task-local lane accumulators
    PartitionedVectorized,
}

impl ReduceStrategy {
    /// All strategies, in benchmark order
    pub const ALL: [ReduceStrategy; 6] = [
        ReduceStrategy::Sequential,
        ReduceStrategy::Vectorized,
        ReduceStrategy::ParallelReduce,
        ReduceStrategy::ParallelTwoPass,
        ReduceStrategy::Partitioned,
        ReduceStrategy::PartitionedVectorized,
    ];

    /// Short name used in benchmark labels
    pub fn name(self) -> &'static str {
        match self {
            ReduceStrategy::Sequential => "sequential",
            ReduceStrategy::Vectorized => "vectorized",
            ReduceStrategy::ParallelReduce => "parallel_reduce",
            ReduceStrategy::ParallelTwoPass => "parallel_two_pass",
            ReduceStrategy::Partitioned => "partitioned",
            ReduceStrategy::PartitionedVectorized => "partitioned_vectorized",
        }
    }
}

/// Sequential reference
pub fn sequential(data: &[f32]) -> MinMax {
    sequential_seeded(data, MinMax::IDENTITY)
}

/// Sequential reduction starting from an arbitrary seed
pub fn sequential_seeded(data: &[f32], seed: MinMax) -> MinMax {
    data.iter().fold(seed, |acc, &x| acc.update(x))
}

/// Pair of lane accumulators
#[derive(Clone, Copy)]
struct LaneAcc<L> {
    vmin: L,
    vmax: L,
}

impl<L: LaneVector<Elem = f32>> LaneAcc<L> {
    fn identity() -> Self {
        Self {
            vmin: L::splat(f32::INFINITY),
            vmax: L::splat(f32::NEG_INFINITY),
        }
    }

    /// Fold whole lane groups of `body` (length must be a multiple of `L::LANES`)
    #[inline(always)]
    fn accumulate(mut self, body: &[f32]) -> Self {
        debug_assert_eq!(body.len() % L::LANES, 0);
        for chunk in body.chunks_exact(L::LANES) {
            // SAFETY: chunks_exact yields exactly L::LANES elements
            let v = unsafe { L::load(chunk.as_ptr()) };
            self.vmin = self.vmin.min(v);
            self.vmax = self.vmax.max(v);
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            vmin: self.vmin.min(other.vmin),
            vmax: self.vmax.max(other.vmax),
        }
    }

    fn horizontal(self) -> MinMax {
        MinMax {
            min: self.vmin.reduce_min(),
            max: self.vmax.reduce_max(),
        }
    }
}

/// Vectorized reduction with scalar tail
pub fn lanes<L: LaneVector<Elem = f32>>(data: &[f32]) -> MinMax {
    let split = data.len() - data.len() % L::LANES;
    let (body, tail) = data.split_at(split);
    let acc = LaneAcc::<L>::identity().accumulate(body).horizontal();
    sequential_seeded(tail, acc)
}

/// Built-in parallel reduction: min and max fused into one pass
pub fn parallel_reduce(data: &[f32]) -> MinMax {
    data.par_iter()
        .fold(|| MinMax::IDENTITY, |acc, &x| acc.update(x))
        .reduce(|| MinMax::IDENTITY, MinMax::merge)
}

/// Built-in parallel reduction run as two passes (max, then min)
pub fn parallel_two_pass(data: &[f32]) -> MinMax {
    let max = data
        .par_iter()
        .copied()
        .reduce(|| f32::NEG_INFINITY, f32::max);
    let min = data.par_iter().copied().reduce(|| f32::INFINITY, f32::min);
    MinMax { min, max }
}

/// Explicit partitioning with task-local scalar accumulators
///
/// `[0, len)` is split into `parts` chunks; each chunk is reduced by its own
/// task into a `MinMax` it owns, and the returned partials are merged in
/// order once every task has joined.
pub fn partitioned(data: &[f32], parts: usize) -> MinMax {
    let partials: Vec<MinMax> = partition::partition(data.len(), parts, 1)
        .into_par_iter()
        .map(|range| sequential(&data[range]))
        .collect();
    partials.into_iter().fold(MinMax::IDENTITY, MinMax::merge)
}

/// Explicit partitioning with task-local lane accumulators
///
/// Only whole lane groups are partitioned. The final step reduces the lane
/// accumulators of all tasks lane-wise, then horizontally, then folds the
/// `len % LANES` trailing elements.
pub fn partitioned_lanes<L: LaneVector<Elem = f32>>(data: &[f32], parts: usize) -> MinMax {
    partitioned_lanes_phased::<L>(data, parts).0
}

/// [`partitioned_lanes`], also returning the time spent in the parallel phase
///
/// The duration covers the fork-join that produces the per-task
/// accumulators. The merge, horizontal step and tail fold come after it.
pub fn partitioned_lanes_phased<L: LaneVector<Elem = f32>>(
    data: &[f32],
    parts: usize,
) -> (MinMax, Duration) {
    let split = data.len() - data.len() % L::LANES;
    let (body, tail) = data.split_at(split);

    let start = Instant::now();
    let partials: Vec<LaneAcc<L>> = partition::partition(body.len(), parts, L::LANES)
        .into_par_iter()
        .map(|range| LaneAcc::<L>::identity().accumulate(&body[range]))
        .collect();
    let parallel = start.elapsed();

    let acc = partials
        .into_iter()
        .fold(LaneAcc::<L>::identity(), LaneAcc::merge)
        .horizontal();
    (sequential_seeded(tail, acc), parallel)
}

/// Run the selected strategy, partitioning over the current rayon pool
pub fn min_max_with<L: LaneVector<Elem = f32>>(strategy: ReduceStrategy, data: &[f32]) -> MinMax {
    match strategy {
        ReduceStrategy::Sequential => sequential(data),
        ReduceStrategy::Vectorized => lanes::<L>(data),
        ReduceStrategy::ParallelReduce => parallel_reduce(data),
        ReduceStrategy::ParallelTwoPass => parallel_two_pass(data),
        ReduceStrategy::Partitioned => partitioned(data, partition::default_parts()),
        ReduceStrategy::PartitionedVectorized => {
            partitioned_lanes::<L>(data, partition::default_parts())
        }
    }
}
