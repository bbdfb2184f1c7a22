//! Seeded benchmark input generation
//!
//! Values are uniform in `[0, 1)`, matching the `rand() / RAND_MAX` arrays
//! the benchmarks were designed around. A fixed seed keeps runs comparable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `len` uniform values in `[0, 1)` from a seeded generator
pub fn uniform(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<f32>()).collect()
}

/// Two independent uniform arrays (`a` from `seed`, `b` from `seed + 1`)
pub fn uniform_pair(len: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
    (uniform(len, seed), uniform(len, seed.wrapping_add(1)))
}
